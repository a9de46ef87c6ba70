//! アドレス解析
//!
//! コマンド文字列先頭のアドレス部を解析し、行番号または行範囲に解決する
//!
//! ```text
//! address := simple (',' simple)? | ','
//! simple  := digits | '.' | '$'
//! ```

/// 解決済みアドレス（1始まりの行番号）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Address {
    /// 単一行。`0` は先頭行の前（挿入位置としてのみ有効）
    Line(usize),
    /// 閉区間の行範囲
    Range { start: usize, end: usize },
    /// 解析失敗
    Invalid,
}

impl Address {
    /// 2つの行番号から範囲アドレスを作る
    ///
    /// `start > end` は不正、`start == end` は単一行に縮退する
    pub fn range(start: usize, end: usize) -> Self {
        if start > end {
            Address::Invalid
        } else if start == end {
            Address::Line(start)
        } else {
            Address::Range { start, end }
        }
    }

    /// 先頭と末尾の行番号
    pub fn bounds(&self) -> Option<(usize, usize)> {
        match *self {
            Address::Line(line) => Some((line, line)),
            Address::Range { start, end } => Some((start, end)),
            Address::Invalid => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Address::Invalid)
    }
}

/// アドレス構成要素の解析結果
enum Component {
    Value(usize),
    Overflow,
    Missing,
}

/// 数字 → `.` → `$` の順で1要素を読む
fn parse_component(input: &str, cursor: usize, count: usize) -> (Component, &str) {
    let digits = input.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        let (number, rest) = input.split_at(digits);
        return match number.parse::<usize>() {
            Ok(value) => (Component::Value(value), rest),
            Err(_) => (Component::Overflow, rest),
        };
    }

    if let Some(rest) = input.strip_prefix('.') {
        return (Component::Value(cursor), rest);
    }

    if let Some(rest) = input.strip_prefix('$') {
        return (Component::Value(count), rest);
    }

    (Component::Missing, input)
}

/// アドレスを解析し、未消費の残り文字列と共に返す
///
/// アドレスが無い場合は現在行 `cursor` を指す。
/// 単独の `,` はバッファ全体 `1..count` を表す（空バッファでは不正）。
pub fn parse_address(input: &str, cursor: usize, count: usize) -> (Address, &str) {
    let (first, rest) = parse_component(input, cursor, count);
    let start = match first {
        Component::Value(value) => value,
        Component::Overflow => return (Address::Invalid, rest),
        Component::Missing => {
            if let Some(rest) = input.strip_prefix(',') {
                return (Address::range(1, count), rest);
            }
            return (Address::Line(cursor), input);
        }
    };

    let Some(rest) = rest.strip_prefix(',') else {
        return (Address::Line(start), rest);
    };

    match parse_component(rest, cursor, count) {
        (Component::Value(end), rest) => (Address::range(start, end), rest),
        (_, rest) => (Address::Invalid, rest),
    }
}
