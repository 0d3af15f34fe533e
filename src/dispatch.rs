use std::process::Command;

use crate::config::Server;

pub const SERVER_TOKEN: &str = "{server}";

/// A non-empty per-server command wins verbatim; otherwise every
/// `{server}` in the global template is replaced by the server name.
pub fn resolve_command(server: &Server, global_command: &str) -> String {
    match server.command.as_deref() {
        Some(command) if !command.is_empty() => command.to_string(),
        _ => global_command.replace(SERVER_TOKEN, &server.name),
    }
}

/// Runs `command` through `bash -c` with the terminal's stdin, stdout and
/// stderr attached. A failing command is reported but never fatal; control
/// goes back to the menu.
pub fn run(command: &str) {
    println!("Running: {command}");
    match Command::new("bash").arg("-c").arg(command).status() {
        Ok(status) if status.success() => {}
        Ok(status) => println!("Command failed: {status}"),
        Err(err) => println!("Command failed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(name: &str, command: Option<&str>) -> Server {
        Server {
            name: name.to_string(),
            description: String::new(),
            command: command.map(str::to_string),
        }
    }

    #[test]
    fn explicit_command_wins_verbatim() {
        let s = server("web1", Some("mosh web1 -- tmux a"));
        assert_eq!(
            resolve_command(&s, "ssh {server}"),
            "mosh web1 -- tmux a"
        );
    }

    #[test]
    fn empty_command_falls_back_to_template() {
        let s = server("web1", Some(""));
        assert_eq!(resolve_command(&s, "ssh {server}"), "ssh web1");
    }

    #[test]
    fn template_replaces_every_occurrence() {
        let s = server("web1", None);
        assert_eq!(
            resolve_command(&s, "echo {server}; ssh {server}"),
            "echo web1; ssh web1"
        );
    }

    #[test]
    fn template_without_token_is_used_as_is() {
        let s = server("web1", None);
        assert_eq!(resolve_command(&s, "ssh jumphost"), "ssh jumphost");
    }
}
