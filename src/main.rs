use altre_ed::{error, logging, App, EditorOptions};
use anyhow::Context;
use std::io;

fn main() -> anyhow::Result<()> {
    error::setup_panic_handler();

    let options = EditorOptions::from_args(std::env::args().skip(1)).apply_env();
    if options.logging_enabled() {
        logging::init(options.logger()).context("ロガーの初期化に失敗しました")?;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut input = stdin.lock();
    let mut output = stdout.lock();
    let mut errors = stderr.lock();

    let mut app = App::new(&options);
    app.run(&mut input, &mut output, &mut errors)
        .context("入出力エラーで終了しました")?;
    app.shutdown();

    Ok(())
}
