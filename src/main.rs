use std::io::stdout;
use std::process::exit;

use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use sshmenu::{resolve_path, self_update, Navigator};

#[derive(Parser)]
#[command(
    name = "sshmenu",
    version,
    about = "Interactive SSH launcher",
    help_template = "{name} {version} - {about}\n\n{usage-heading} {usage}\n\n{all-args}"
)]
struct Cli {
    /// Update to the latest release from GitHub
    #[arg(long)]
    update: bool,

    /// Filter servers by name or description (words are joined with spaces)
    search: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    if cli.update {
        if let Err(err) = self_update() {
            println!("{err}");
            exit(err.exit_code());
        }
        return;
    }

    // One screen clear at startup, never inside the menu loop.
    let _ = execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0));

    let config_path = match resolve_path() {
        Ok(path) => path,
        Err(err) => {
            println!("Error determining executable path: {err}");
            exit(1);
        }
    };

    let mut navigator = Navigator::new(config_path);
    let search = cli.search.join(" ");
    let result = if search.is_empty() {
        navigator.run()
    } else {
        navigator.run_filtered(&search)
    };

    if let Err(err) = result {
        println!("Error loading config: {err}");
        exit(1);
    }
}
