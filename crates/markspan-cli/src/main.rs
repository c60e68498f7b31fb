use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use markspan_core::{Mark, MarkKind, decode, encode, encode_sanitized};

enum MarksMode {
    Json,
    Pretty,
}

fn main() {
    let mut input: Option<String> = None;
    let mut sanitized = false;
    let mut print_text = false;
    let mut marks_mode: Option<MarksMode> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "--sanitized" => sanitized = true,
            "--text" => print_text = true,
            "--marks" => {
                let mode = match args.next().as_deref() {
                    Some("json") => MarksMode::Json,
                    Some("pretty") => MarksMode::Pretty,
                    _ => {
                        eprintln!("--marks expects: json | pretty");
                        print_usage();
                        process::exit(2);
                    }
                };
                marks_mode = Some(mode);
            }
            _ => {
                if arg.starts_with('-') {
                    eprintln!("unexpected argument: {}", arg);
                    print_usage();
                    process::exit(2);
                }
                if input.is_none() {
                    input = Some(arg);
                } else {
                    eprintln!("unexpected argument: {}", arg);
                    print_usage();
                    process::exit(2);
                }
            }
        }
    }

    let source = match input {
        Some(path) => fs::read_to_string(&path).unwrap_or_else(|err| {
            eprintln!("failed to read {}: {}", path, err);
            process::exit(1);
        }),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).unwrap_or_else(|err| {
                eprintln!("failed to read stdin: {}", err);
                process::exit(1);
            });
            buffer
        }
    };

    let document = decode(&source);

    if let Some(mode) = marks_mode {
        match mode {
            MarksMode::Json => println!("{}", marks_to_json(&document.marks)),
            MarksMode::Pretty => {
                for mark in &document.marks {
                    match &mark.data {
                        Some(data) => println!(
                            "{:<11} [{}, {}) {}",
                            kind_label(mark.kind),
                            mark.start,
                            mark.end,
                            data
                        ),
                        None => println!(
                            "{:<11} [{}, {})",
                            kind_label(mark.kind),
                            mark.start,
                            mark.end
                        ),
                    }
                }
            }
        }
        return;
    }

    if print_text {
        println!("{}", document.text);
        return;
    }

    let markup = if sanitized {
        encode_sanitized(&document)
    } else {
        encode(&document)
    };
    println!("{}", markup);
}

fn kind_label(kind: MarkKind) -> &'static str {
    match kind {
        MarkKind::Bold => "bold",
        MarkKind::Italic => "italic",
        MarkKind::Underline => "underline",
        MarkKind::Strike => "strike",
        MarkKind::Code => "code",
        MarkKind::Link => "link",
        MarkKind::FontSize => "font-size",
        MarkKind::FontColor => "font-color",
        MarkKind::FontFamily => "font-family",
    }
}

fn marks_to_json(marks: &[Mark]) -> String {
    if marks.is_empty() {
        return "[]".to_string();
    }

    let mut out = String::new();
    out.push_str("[\n");
    for (idx, mark) in marks.iter().enumerate() {
        out.push_str("  {\n");
        out.push_str(&format!("    \"kind\": \"{}\",\n", kind_label(mark.kind)));
        out.push_str(&format!("    \"start\": {},\n", mark.start));
        out.push_str(&format!("    \"end\": {},\n", mark.end));
        match &mark.data {
            Some(data) => {
                out.push_str(&format!("    \"data\": \"{}\"\n", escape_json(data)));
            }
            None => out.push_str("    \"data\": null\n"),
        }
        out.push_str("  }");
        if idx + 1 < marks.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push(']');
    out
}

fn escape_json(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if (ch as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", ch as u32)),
            ch => out.push(ch),
        }
    }
    out
}

fn print_usage() {
    eprintln!("usage: markspan-cli [options] [input]");
    eprintln!();
    eprintln!("Decodes markup (from a file or stdin) and re-encodes it in canonical form.");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --sanitized        sanitize the re-encoded markup");
    eprintln!("  --text             print the decoded plain text instead");
    eprintln!("  --marks MODE       print the decoded marks (json | pretty) instead");
    eprintln!("  -h, --help         show this help");
}
