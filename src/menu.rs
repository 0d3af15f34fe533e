use std::io::{self, Write};
use std::path::PathBuf;

use crossterm::{
    cursor::MoveToColumn,
    execute,
    terminal::{Clear, ClearType},
};

use crate::bell::BellFilter;
use crate::config::{Config, Server};
use crate::dispatch;
use crate::error::ConfigError;
use crate::prompt::{Outcome, Select};

const QUIT_ENTRY: &str = "\u{23FB} Quit";
const BACK_ENTRY: &str = "\u{2B05} Back";
const NAV_HINT: &str =
    "Use \u{2191}/\u{2193} to navigate, Enter to select. Select '\u{23FB} Quit' to exit.";

enum Stage {
    ProjectSelect,
    ServerSelect(usize),
}

/// Drives the two navigation modes. Hierarchical mode loops until the
/// user quits; flat mode runs at most one command and returns.
pub struct Navigator {
    config_path: PathBuf,
    printed_hint: bool,
}

impl Navigator {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            printed_hint: false,
        }
    }

    /// Flat filtered mode: one list across all projects, one dispatch.
    pub fn run_filtered(&mut self, search: &str) -> Result<(), ConfigError> {
        let config = Config::load(&self.config_path)?;
        let matches = config.filter(search);
        if matches.is_empty() {
            println!("No servers found matching: {search}");
            return Ok(());
        }

        let rows = server_rows(&matches, QUIT_ENTRY);
        let outcome = match self.present("Select Server", &rows) {
            Ok(outcome) => outcome,
            Err(err) => {
                println!("Prompt failed: {err}");
                return Ok(());
            }
        };
        match outcome {
            Outcome::Interrupted | Outcome::EndOfInput => println!("Exiting."),
            Outcome::Selected(idx) if idx == rows.len() - 1 => println!("Exiting."),
            Outcome::Selected(idx) if idx < matches.len() => {
                let command = dispatch::resolve_command(&matches[idx], &config.global_command);
                dispatch::run(&command);
            }
            Outcome::Selected(_) => {}
        }
        Ok(())
    }

    /// Hierarchical mode: project list, then that project's servers in a
    /// loop. The config file is re-read every time control returns to
    /// project selection, so edits show up without a restart.
    pub fn run(&mut self) -> Result<(), ConfigError> {
        let mut config = Config::load(&self.config_path)?;
        let mut stage = Stage::ProjectSelect;
        loop {
            match stage {
                Stage::ProjectSelect => {
                    config = Config::load(&self.config_path)?;
                    if !self.printed_hint {
                        println!("{NAV_HINT}");
                        self.printed_hint = true;
                    }
                    let rows = project_rows(&config);
                    let outcome = match self.present("Select Project", &rows) {
                        Ok(outcome) => outcome,
                        Err(err) => {
                            println!("Prompt failed: {err}");
                            return Ok(());
                        }
                    };
                    match outcome {
                        Outcome::Interrupted | Outcome::EndOfInput => {
                            println!("Exiting.");
                            return Ok(());
                        }
                        Outcome::Selected(idx) if idx == rows.len() - 1 => {
                            println!("Exiting.");
                            return Ok(());
                        }
                        Outcome::Selected(idx) if idx < config.projects.len() => {
                            stage = Stage::ServerSelect(idx);
                        }
                        Outcome::Selected(_) => return Ok(()),
                    }
                }
                Stage::ServerSelect(project_idx) => {
                    let Some(project) = config.projects.get(project_idx) else {
                        stage = Stage::ProjectSelect;
                        continue;
                    };
                    let rows = server_rows(&project.servers, BACK_ENTRY);
                    loop {
                        let outcome = match self.present("Select Server", &rows) {
                            Ok(outcome) => outcome,
                            Err(err) => {
                                println!("Prompt failed: {err}");
                                return Ok(());
                            }
                        };
                        match outcome {
                            Outcome::Interrupted | Outcome::EndOfInput => {
                                println!("Exiting.");
                                return Ok(());
                            }
                            Outcome::Selected(idx) if idx == rows.len() - 1 => {
                                stage = Stage::ProjectSelect;
                                break;
                            }
                            Outcome::Selected(idx) if idx < project.servers.len() => {
                                let command = dispatch::resolve_command(
                                    &project.servers[idx],
                                    &config.global_command,
                                );
                                dispatch::run(&command);
                            }
                            Outcome::Selected(_) => continue,
                        }
                    }
                }
            }
        }
    }

    fn present(&self, label: &str, rows: &[String]) -> io::Result<Outcome> {
        let mut out = BellFilter::new(io::stdout());
        let outcome = Select::new(label, rows, &mut out).run();
        clear_line();
        outcome
    }
}

/// Display rows for a server list, with the synthetic trailing entry
/// (Quit in flat mode, Back in hierarchical mode).
fn server_rows(servers: &[Server], trailing: &str) -> Vec<String> {
    let mut rows: Vec<String> = servers.iter().map(Server::display).collect();
    rows.push(trailing.to_string());
    rows
}

fn project_rows(config: &Config) -> Vec<String> {
    let mut rows: Vec<String> = config.projects.iter().map(|p| p.name.clone()).collect();
    rows.push(QUIT_ENTRY.to_string());
    rows
}

// Drop leftover prompt artifacts from the current line before the next
// plain println.
fn clear_line() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, MoveToColumn(0), Clear(ClearType::UntilNewLine));
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        serde_yaml::from_str(
            "\
global_command: \"pamssh {server}\"
projects:
  - name: A
    servers:
      - name: s1
        description: d1
",
        )
        .unwrap()
    }

    #[test]
    fn server_rows_end_with_synthetic_entry() {
        let config = config();
        let rows = server_rows(&config.projects[0].servers, QUIT_ENTRY);
        assert_eq!(rows, ["s1 - d1", QUIT_ENTRY]);
        let rows = server_rows(&config.projects[0].servers, BACK_ENTRY);
        assert_eq!(rows.last().map(String::as_str), Some(BACK_ENTRY));
    }

    #[test]
    fn project_rows_end_with_quit() {
        let rows = project_rows(&config());
        assert_eq!(rows, ["A", QUIT_ENTRY]);
    }

    #[test]
    fn no_match_search_returns_without_prompting() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"global_command: \"ssh {server}\"\n\
projects:\n\
  - name: A\n\
    servers:\n\
      - name: s1\n\
        description: d1\n",
        )
        .unwrap();
        let mut navigator = Navigator::new(file.path().to_path_buf());
        // zero matches: prints the no-match message and returns before
        // any widget is built
        navigator.run_filtered("zzz-no-such-server").unwrap();
    }

    #[test]
    fn filtered_selection_resolves_global_template() {
        // the end-to-end path: filter by description, resolve the command
        let config = config();
        let matches = config.filter("d1");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].display(), "s1 - d1");
        let command = dispatch::resolve_command(&matches[0], &config.global_command);
        assert_eq!(command, "pamssh s1");
    }
}
