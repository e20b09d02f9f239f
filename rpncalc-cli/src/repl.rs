// Line-editing REPL over an in-memory transcript

use editline::{LineEditor, terminals::StdioTerminal};
use std::io::Write;
use tracing::debug;

use rpncalc_core::commands::COMMANDS;
use rpncalc_core::operator::OPERATORS;
use rpncalc_core::{Command, Settings, Transcript, dispatch};

/// What a single input line asks for.
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Blank,
    Text(&'a str),
    Command { name: &'a str, arg: &'a str },
    Help(Option<&'a str>),
    Quit,
}

fn classify(line: &str, prefix: char) -> Line<'_> {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix(prefix) else {
        return if trimmed.is_empty() { Line::Blank } else { Line::Text(trimmed) };
    };

    let (name, arg) = rest
        .trim_start()
        .split_once(char::is_whitespace)
        .map_or((rest.trim_start(), ""), |(name, arg)| (name, arg.trim()));
    match name {
        "quit" | "exit" => Line::Quit,
        "help" => Line::Help(Some(arg).filter(|arg| !arg.is_empty())),
        _ => Line::Command { name, arg },
    }
}

fn print_help(topic: Option<&str>) {
    let docs = COMMANDS
        .iter()
        .map(|(name, doc)| (*name, *doc, ""))
        .chain(OPERATORS.iter().map(|info| {
            (info.name, info.doc, info.aliases.first().copied().unwrap_or(""))
        }));

    match topic {
        Some(topic) => match docs.into_iter().find(|(name, _, alias)| *name == topic || *alias == topic) {
            Some((name, doc, _)) => println!("{name}: {doc}"),
            None => println!("No such command: {topic}"),
        },
        None => {
            for (name, doc, alias) in docs {
                let summary = doc.lines().next().unwrap_or("");
                if alias.is_empty() {
                    println!("  {name:<16}{summary}");
                } else {
                    println!("  {:<16}{summary}", format!("{name} ({alias})"));
                }
            }
        }
    }
}

pub fn run_repl(settings: Settings, prefix: char) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("rpncalc v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Type plain text to add it to the transcript");
    println!("Type `{prefix}push 42`, `{prefix}add`, ... to run calculator commands");
    println!("Type `{prefix}help` for the command list, `{prefix}quit` or Ctrl-D to exit");
    println!();

    let mut transcript = Transcript::with_settings(settings);
    let mut editor = LineEditor::new(1024, 50);
    let mut terminal = StdioTerminal::new();

    loop {
        print!("\n> ");
        std::io::stdout().flush()?;

        match editor.read_line(&mut terminal) {
            Ok(line) => match classify(&line, prefix) {
                Line::Blank => continue,
                Line::Quit => break,
                Line::Help(topic) => print_help(topic),
                Line::Text(text) => {
                    transcript.type_text(text);
                    println!("{}", transcript.rendered());
                }
                Line::Command { name, arg } => match name.parse::<Command>() {
                    Ok(command) => {
                        let record = dispatch(&transcript, command, arg);
                        debug!(?record, "emitting");
                        transcript.apply(record);
                        println!("{}", transcript.rendered());
                    }
                    Err(e) => eprintln!("Error: {}", e),
                },
            },
            Err(editline::Error::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(editline::Error::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_lines() {
        assert_eq!(classify("   ", ':'), Line::Blank);
        assert_eq!(classify("hello 12", ':'), Line::Text("hello 12"));
        assert_eq!(classify(":add", ':'), Line::Command { name: "add", arg: "" });
        assert_eq!(
            classify(":apply-function  x: x + 1 ", ':'),
            Line::Command { name: "apply-function", arg: "x: x + 1" }
        );
        assert_eq!(classify(": push 5", ':'), Line::Command { name: "push", arg: "5" });
        assert_eq!(classify(":help", ':'), Line::Help(None));
        assert_eq!(classify(":help swap", ':'), Line::Help(Some("swap")));
        assert_eq!(classify("!quit", '!'), Line::Quit);
    }
}
