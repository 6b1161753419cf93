use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser as ClapParser;
use colored::Colorize;

use santa_fmt::format;

const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(ClapParser)]
#[command(
    name = "santa-fmt",
    about = "An opinionated formatter for santa-lang source files",
    version,
    disable_version_flag = true
)]
struct Cli {
    /// Rewrite files in place instead of printing to stdout
    #[arg(short = 'w')]
    write: bool,
    /// Print the paths of files whose formatting differs; exit 1 if any do
    #[arg(short = 'l')]
    list: bool,
    /// Print a diff for each file whose formatting differs
    #[arg(short = 'd')]
    diff: bool,
    /// Print version information
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,
    /// Files or directories to format; reads stdin when omitted
    paths: Vec<PathBuf>,
}

#[derive(Default)]
struct Status {
    errored: bool,
    differed: bool,
}

fn main() {
    let cli = Cli::parse();
    let mut status = Status::default();

    if cli.paths.is_empty() {
        if cli.write {
            eprintln!("{}", "cannot use -w with standard input".red());
            process::exit(2);
        }
        run_stdin(&cli, &mut status);
    } else {
        for path in &cli.paths {
            process_path(&cli, path, &mut status);
        }
    }

    if status.errored || (cli.list && status.differed) {
        process::exit(1);
    }
}

fn run_stdin(cli: &Cli, status: &mut Status) {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("{}", format!("<stdin>: {}", e).red());
        status.errored = true;
        return;
    }

    match format(&source) {
        Ok(formatted) => emit(cli, "<stdin>", &source, &formatted, status),
        Err(e) => {
            eprintln!("{}", format!("<stdin>: {}", e).red());
            status.errored = true;
        }
    }
}

fn process_path(cli: &Cli, path: &Path, status: &mut Status) {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", format!("{}: {}", path.display(), e).red());
            status.errored = true;
            return;
        }
    };

    if metadata.is_dir() {
        process_dir(cli, path, status);
    } else {
        process_file(cli, path, status);
    }
}

fn process_dir(cli: &Cli, dir: &Path, status: &mut Status) {
    let entries = match fs::read_dir(dir) {
        Ok(iter) => iter,
        Err(e) => {
            eprintln!("{}", format!("{}: {}", dir.display(), e).red());
            status.errored = true;
            return;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    paths.sort();

    for path in paths {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };
        if name.starts_with('.') {
            continue;
        }
        if path.is_dir() {
            process_dir(cli, &path, status);
        } else if name.ends_with(".santa") {
            process_file(cli, &path, status);
        }
    }
}

fn process_file(cli: &Cli, path: &Path, status: &mut Status) {
    match fs::metadata(path) {
        Ok(m) if m.len() > MAX_FILE_SIZE => {
            eprintln!(
                "{}",
                format!("{}: file exceeds the 10 MiB limit", path.display()).red()
            );
            status.errored = true;
            return;
        }
        Err(e) => {
            eprintln!("{}", format!("{}: {}", path.display(), e).red());
            status.errored = true;
            return;
        }
        _ => {}
    }

    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", format!("{}: {}", path.display(), e).red());
            status.errored = true;
            return;
        }
    };

    let formatted = match format(&source) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{}", format!("{}: {}", path.display(), e).red());
            status.errored = true;
            return;
        }
    };

    if cli.write {
        if formatted != source {
            if let Err(e) = fs::write(path, &formatted) {
                eprintln!("{}", format!("{}: {}", path.display(), e).red());
                status.errored = true;
            }
        }
        return;
    }

    emit(cli, &path.display().to_string(), &source, &formatted, status);
}

fn emit(cli: &Cli, name: &str, source: &str, formatted: &str, status: &mut Status) {
    if cli.list {
        if formatted != source {
            println!("{}", name);
            status.differed = true;
        }
        return;
    }

    if cli.diff {
        if formatted != source {
            print!("{}", render_diff(name, source, formatted));
            status.differed = true;
        }
        return;
    }

    print!("{}", formatted);
    io::stdout().flush().ok();
}

/// A naive per-line diff: one `@@` hunk per differing line index, with
/// one-sided hunks for trailing additions or removals.
fn render_diff(name: &str, original: &str, formatted: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("diff {}\n--- {}\n+++ formatted\n", name, name));

    let old: Vec<&str> = original.lines().collect();
    let new: Vec<&str> = formatted.lines().collect();

    for i in 0..old.len().max(new.len()) {
        match (old.get(i), new.get(i)) {
            (Some(o), Some(n)) if o != n => {
                out.push_str(&format!("@@ -{} +{} @@\n-{}\n+{}\n", i + 1, i + 1, o, n));
            }
            (Some(o), None) => {
                out.push_str(&format!("@@ -{} +{} @@\n-{}\n", i + 1, i + 1, o));
            }
            (None, Some(n)) => {
                out.push_str(&format!("@@ -{} +{} @@\n+{}\n", i + 1, i + 1, n));
            }
            _ => {}
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::render_diff;

    #[test]
    fn diff_marks_changed_lines() {
        let diff = render_diff("day_01.santa", "let x=1\nlet y = 2\n", "let x = 1\nlet y = 2\n");
        assert_eq!(
            diff,
            "diff day_01.santa\n--- day_01.santa\n+++ formatted\n@@ -1 +1 @@\n-let x=1\n+let x = 1\n"
        );
    }

    #[test]
    fn diff_marks_trailing_additions() {
        let diff = render_diff("x.santa", "a\n", "a\nb\n");
        assert!(diff.ends_with("@@ -2 +2 @@\n+b\n"));
    }
}
