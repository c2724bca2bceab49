use secrecy::SecretString;
use std::io::IsTerminal;
use std::io::{self, BufRead, Write};

use crate::note::{PasswordProvider, PromptError};

/// Password and its confirmation for sealing. Checking them is left to the
/// protocol so that the same rules apply to every front end.
pub fn prompt_seal_passwords() -> io::Result<(SecretString, SecretString)> {
    let first = read_secret_line("Note password: ")?;
    let confirm = read_secret_line("Confirm note password: ")?;
    Ok((secret(first), secret(confirm)))
}

/// Reads from the terminal without echo, or line by line from piped stdin.
/// An empty line or end of input cancels.
pub struct TerminalPrompt;

impl PasswordProvider for TerminalPrompt {
    fn prompt(&mut self, message: &str) -> Result<Option<SecretString>, PromptError> {
        let line = read_secret_line(message)?;
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(secret(line)))
    }
}

fn secret(s: String) -> SecretString {
    SecretString::new(s.into_boxed_str())
}

fn read_secret_line(prompt: &str) -> io::Result<String> {
    eprint!("{prompt}");
    io::stderr().flush()?;

    if io::stdin().is_terminal() {
        #[cfg(unix)]
        {
            return read_line_no_echo_unix();
        }
    }

    read_line_plain()
}

fn read_line_plain() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(trim_line_endings(&line))
}

#[cfg(unix)]
fn read_line_no_echo_unix() -> io::Result<String> {
    use std::mem::MaybeUninit;
    use std::os::unix::io::AsRawFd;

    let stdin = io::stdin();
    let fd = stdin.as_raw_fd();

    // SAFETY: termios is plain data filled in by tcgetattr before use, and the
    // guard restores the original settings on every exit path.
    unsafe {
        let mut original = MaybeUninit::<libc::termios>::uninit();
        if libc::tcgetattr(fd, original.as_mut_ptr()) != 0 {
            return read_line_plain();
        }
        let original = original.assume_init();

        let mut modified = original;
        modified.c_lflag &= !(libc::ECHO | libc::ECHONL);
        let _guard = TermiosGuard {
            fd,
            original,
            active: libc::tcsetattr(fd, libc::TCSANOW, &modified) == 0,
        };

        let line = read_line_plain()?;
        eprintln!();
        Ok(line)
    }
}

#[cfg(unix)]
struct TermiosGuard {
    fd: i32,
    original: libc::termios,
    active: bool,
}

#[cfg(unix)]
impl Drop for TermiosGuard {
    fn drop(&mut self) {
        if self.active {
            unsafe {
                let _ = libc::tcsetattr(self.fd, libc::TCSANOW, &self.original);
            }
        }
    }
}

fn trim_line_endings(s: &str) -> String {
    s.trim_end_matches(&['\n', '\r'][..]).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_crlf_only() {
        assert_eq!(trim_line_endings("pw \r\n"), "pw ");
        assert_eq!(trim_line_endings("pw\n"), "pw");
        assert_eq!(trim_line_endings(""), "");
    }
}
