use aoimapper::{execute, init_logging, App, Command, RecordingMapView, SettingsManager};
use anyhow::Context;
use std::io::{self, BufRead, Write};

fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!(
        "AOI Mapper {} (built {})",
        aoimapper::VERSION,
        aoimapper::BUILD_DATE
    );

    let settings = SettingsManager::new().context("Failed to open settings directory")?;
    let mut app = App::from_settings(&settings, RecordingMapView::new());
    app.mount();

    println!("AOI Mapper {} - type 'help' for commands", aoimapper::VERSION);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => writeln!(stdout, "{}", execute(&mut app, command))?,
            Err(e) => writeln!(stdout, "{}", e)?,
        }
    }

    app.unmount();
    Ok(())
}
