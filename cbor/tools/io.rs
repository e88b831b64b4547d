/*!
Reading inputs from files or stdin, and writing outputs to files or stdout
*/

use anyhow::Context;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::str::FromStr;

/// Where to read from: '-' selects stdin
#[derive(Debug, Clone)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// A name for the input suitable for diagnostics
    pub fn filepath(&self) -> String {
        match self {
            Input::Stdin => "<stdin>".to_string(),
            Input::File(path) => path.display().to_string(),
        }
    }

    pub fn read_all(&self) -> anyhow::Result<Vec<u8>> {
        let data = match self {
            Input::Stdin => {
                let mut buffer = Vec::new();
                io::stdin().read_to_end(&mut buffer).map(|_| buffer)
            }
            Input::File(path) => fs::read(path),
        };
        data.with_context(|| format!("Failed to read {}", self.filepath()))
    }

    pub fn read_to_string(&self) -> anyhow::Result<String> {
        String::from_utf8(self.read_all()?)
            .with_context(|| format!("{} is not valid UTF-8", self.filepath()))
    }
}

impl FromStr for Input {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "-" => Input::Stdin,
            path => Input::File(PathBuf::from(path)),
        })
    }
}

/// Where to write to: empty or '-' selects stdout
#[derive(Debug, Clone)]
pub enum Output {
    Stdout,
    File(PathBuf),
}

impl Output {
    pub fn write_all(&self, data: &[u8]) -> anyhow::Result<()> {
        match self {
            Output::Stdout => io::stdout()
                .write_all(data)
                .context("Failed to write to stdout"),
            Output::File(path) => {
                fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
            }
        }
    }

    pub fn write_str(&self, data: &str) -> anyhow::Result<()> {
        self.write_all(data.as_bytes())
    }
}

impl FromStr for Output {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "-" => Output::Stdout,
            path => Output::File(PathBuf::from(path)),
        })
    }
}
