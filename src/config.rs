//! 起動オプション
//!
//! コマンドライン引数と環境変数からエディタの設定を組み立てる

use crate::logging::{LogLevel, Logger};
use std::path::PathBuf;

/// 既定のプロンプト文字列
pub const DEFAULT_PROMPT: &str = "*";

/// 設定されているとデバッグログを標準エラー出力へ出す環境変数
pub const DEBUG_ENV_VAR: &str = "ALTRE_ED_DEBUG";

/// 既定のデバッグログ出力先
pub const DEFAULT_LOG_FILE: &str = "altre-ed.log";

/// エディタの起動オプション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    /// プロンプト文字列（`P` で表示を切り替える）
    pub prompt: String,
    /// 起動時からプロンプトを表示するか
    pub prompt_enabled: bool,
    /// エラー時に `?` に続けてメッセージを表示するか
    pub verbose_errors: bool,
    pub log_level: LogLevel,
    pub log_stderr: bool,
    pub log_file: Option<PathBuf>,
    /// 起動時に読み込むファイル
    pub initial_file: Option<String>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            prompt_enabled: false,
            verbose_errors: false,
            log_level: LogLevel::Off,
            log_stderr: false,
            log_file: None,
            initial_file: None,
        }
    }
}

impl EditorOptions {
    /// コマンドライン引数（プログラム名を除く）から設定を作成
    ///
    /// * `-p`, `--prompt PROMPT`: プロンプト文字列を設定して表示を有効化
    /// * `-v`, `--verbose`: 詳細エラー表示
    /// * `--debug-log [PATH]`: デバッグログをファイルへ出力
    /// * `--log-level LEVEL`: ログレベル
    /// * 最初の位置引数: 起動時に開くファイル
    ///
    /// 未知のフラグは無視する
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut options = Self::default();

        let mut iter = args.iter().peekable();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-p" | "--prompt" => {
                    if let Some(prompt) = iter.next_if(|next| !next.starts_with('-')) {
                        options.prompt = prompt.clone();
                    }
                    options.prompt_enabled = true;
                }
                "-v" | "--verbose" => options.verbose_errors = true,
                "--debug-log" => {
                    let path = iter
                        .next_if(|next| !next.starts_with('-'))
                        .map(PathBuf::from)
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
                    options.log_file = Some(path);
                    if options.log_level == LogLevel::Off {
                        options.log_level = LogLevel::Debug;
                    }
                }
                "--log-level" => {
                    if let Some(level) = iter.next().and_then(|name| LogLevel::parse(name)) {
                        options.log_level = level;
                    }
                }
                flag if flag.starts_with('-') && flag.len() > 1 => {}
                file => {
                    if options.initial_file.is_none() {
                        options.initial_file = Some(file.to_string());
                    }
                }
            }
        }

        options
    }

    /// 環境変数による上書きを反映
    pub fn apply_env(self) -> Self {
        let debug = std::env::var_os(DEBUG_ENV_VAR).is_some();
        self.with_debug_env(debug)
    }

    fn with_debug_env(mut self, debug: bool) -> Self {
        if debug {
            self.log_level = LogLevel::Debug;
            self.log_stderr = true;
        }
        self
    }

    /// 設定に対応するロガー
    pub fn logger(&self) -> Logger {
        let mut logger = Logger::new(self.log_level);
        if !self.log_stderr {
            logger = logger.without_stderr();
        }
        if let Some(path) = &self.log_file {
            logger = logger.with_file_output(path);
        }
        logger
    }

    /// ログ出力が有効か
    pub fn logging_enabled(&self) -> bool {
        self.log_level != LogLevel::Off && (self.log_stderr || self.log_file.is_some())
    }
}
