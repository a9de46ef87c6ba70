//! パス処理ユーティリティ
//!
//! コマンド引数のファイル名に含まれる `~` と環境変数を展開する

use std::path::PathBuf;

/// ホームディレクトリを展開（~ → /home/user）
///
/// `~user` 形式は展開せずそのまま返す
pub fn expand_home(name: &str) -> String {
    if name == "~" || name.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            return format!("{}{}", home.display(), &name[1..]);
        }
    }
    name.to_string()
}

/// ファイル名を展開してパスにする
///
/// 未定義の環境変数を含む場合は展開前の文字列をそのまま使う
pub fn expand_path(name: &str) -> PathBuf {
    let with_home = expand_home(name);
    if !with_home.contains('$') {
        return PathBuf::from(with_home);
    }

    match shellexpand::env(&with_home) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(e) => {
            log::warn!("環境変数展開エラー: {}", e);
            PathBuf::from(with_home)
        }
    }
}
