//! ヤンクレジスタ実装

/// 直近の削除・変更で取り除かれた行を保持するレジスタ
///
/// 行ストアとは共有せず、常に複製を保持する。
/// 削除・変更のたびに内容全体が置き換わり、`put` では変化しない
#[derive(Debug, Default, Clone)]
pub struct YankRegister {
    lines: Vec<String>,
}

impl YankRegister {
    /// 空のレジスタを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 内容を置き換える（追記はしない）
    pub fn replace(&mut self, lines: Vec<String>) {
        self.lines = lines;
    }

    /// 挿入用の複製を取得
    pub fn yank(&self) -> Vec<String> {
        self.lines.clone()
    }

    /// 保持している行
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
