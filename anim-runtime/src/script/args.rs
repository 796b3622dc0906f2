//! # 参数归一化
//!
//! 命令参数从不报错：非数字视为 0，再钳制到允许范围。

/// 解析字符串开头的整数（可带正负号），无数字时返回 `None`
///
/// `"12abc"` → `Some(12)`，`"abc"` → `None`，`"-3"` → `Some(-3)`
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // 超长数字按饱和处理，反正之后还要钳制
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// 整数参数：缺失或非数字视为 0，钳制到 `[min, max]`
pub fn arg_number(arg: Option<&str>, min: i64, max: i64) -> i64 {
    arg.and_then(parse_int_prefix).unwrap_or(0).clamp(min, max)
}

/// 无符号整数参数，语义同 [`arg_number`]
pub fn arg_u32(arg: Option<&str>, min: u32, max: u32) -> u32 {
    arg_number(arg, i64::from(min), i64::from(max)) as u32
}

/// 整数数组参数：逗号分隔，可用 `[...]` 包裹，每个元素单独钳制
///
/// 参数缺失时得到 `[min]`（空串分割后只有一个非数字元素）。
pub fn arg_u32_array(arg: Option<&str>, min: u32, max: u32) -> Vec<u32> {
    let raw = arg.unwrap_or("").trim();
    let raw = raw.strip_prefix('[').unwrap_or(raw);
    let raw = raw.strip_suffix(']').unwrap_or(raw);
    raw.split(',')
        .map(|item| arg_u32(Some(item), min, max))
        .collect()
}

/// 等待标记：`WAIT`（大小写不敏感）或 `ウェイトあり`
pub fn is_wait_flag(arg: Option<&str>) -> bool {
    arg.is_some_and(|a| a == "ウェイトあり" || a.eq_ignore_ascii_case("WAIT"))
}

/// 命令种类（别名归一化后的结果）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Init,
    Start,
    StartLoop,
    Stop,
    StopForce,
    SetCell,
    ProgCell,
    Show,
    Erase,
    Wait,
}

/// 把命令名归一化为 [`CommandKind`]
///
/// 大小写不敏感，`PA_` 前缀可省略，同时接受原插件的日文命令名。
pub fn command_kind(name: &str) -> Option<CommandKind> {
    let upper = name.to_uppercase();
    let short = upper.strip_prefix("PA_").unwrap_or(&upper);

    let kind = match short {
        "INIT" | "ピクチャのアニメーション準備" => CommandKind::Init,
        "START" | "ピクチャのアニメーション開始" => CommandKind::Start,
        "START_LOOP" | "ピクチャのループアニメーション開始" => CommandKind::StartLoop,
        "STOP" | "ピクチャのアニメーション終了" => CommandKind::Stop,
        "STOP_FORCE" | "ピクチャのアニメーション強制終了" => CommandKind::StopForce,
        "SET_CELL" | "ピクチャのアニメーションセル設定" => CommandKind::SetCell,
        "PROG_CELL" | "ピクチャのアニメーションセル進行" => CommandKind::ProgCell,
        "SHOW" | "ピクチャの表示" => CommandKind::Show,
        "ERASE" | "ピクチャの消去" => CommandKind::Erase,
        "WAIT" | "ウェイト" => CommandKind::Wait,
        _ => return None,
    };
    Some(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_prefix() {
        assert_eq!(parse_int_prefix("42"), Some(42));
        assert_eq!(parse_int_prefix("  7px"), Some(7));
        assert_eq!(parse_int_prefix("-3"), Some(-3));
        assert_eq!(parse_int_prefix("+8"), Some(8));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    #[test]
    fn test_arg_number_clamps_and_coerces() {
        assert_eq!(arg_u32(Some("4"), 1, 200), 4);
        assert_eq!(arg_u32(Some("500"), 1, 200), 200);
        assert_eq!(arg_u32(Some("-5"), 0, 9999), 0);
        // 非数字 → 0 → 钳制
        assert_eq!(arg_u32(Some("abc"), 1, 200), 1);
        assert_eq!(arg_u32(None, 1, 9999), 1);
        assert_eq!(arg_u32(None, 0, 9999), 0);
    }

    #[test]
    fn test_arg_array() {
        assert_eq!(arg_u32_array(Some("[1,2,1,3,1,4]"), 1, 200), vec![1, 2, 1, 3, 1, 4]);
        assert_eq!(arg_u32_array(Some("3,x,999"), 1, 200), vec![3, 1, 200]);
        assert_eq!(arg_u32_array(None, 1, 200), vec![1]);
    }

    #[test]
    fn test_wait_flag() {
        assert!(is_wait_flag(Some("WAIT")));
        assert!(is_wait_flag(Some("wait")));
        assert!(is_wait_flag(Some("ウェイトあり")));
        assert!(!is_wait_flag(Some("nowait")));
        assert!(!is_wait_flag(None));
    }

    #[test]
    fn test_command_kind_aliases() {
        assert_eq!(command_kind("PA_INIT"), Some(CommandKind::Init));
        assert_eq!(command_kind("pa_start_loop"), Some(CommandKind::StartLoop));
        assert_eq!(command_kind("STOP_FORCE"), Some(CommandKind::StopForce));
        assert_eq!(
            command_kind("ピクチャのアニメーションセル進行"),
            Some(CommandKind::ProgCell)
        );
        assert_eq!(command_kind("show"), Some(CommandKind::Show));
        assert_eq!(command_kind("PA_JUMP"), None);
    }
}
