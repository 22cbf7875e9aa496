//! `clvchat ask` and `clvchat chat`.

use std::io::{self, BufRead, Write};

use clvchat_engine::{ChatSession, Entry};

use crate::{CliError, Context};

pub fn cmd_ask(ctx: &Context, words: &[String], json: bool) -> Result<(), CliError> {
    let input = words.join(" ");
    if input.is_empty() {
        return Err(CliError::args("empty question"));
    }

    let loaded = ctx.load_table()?;
    let responder = ctx.responder(&loaded)?;
    let mut session = ChatSession::new(&responder);
    let reply = session.submit_reply(&input);

    log::debug!("intent {:?} -> answer {:?}", reply.intent, reply.answer_key);

    if json {
        let out = serde_json::to_string_pretty(&reply)
            .map_err(|e| CliError::eval(format!("JSON serialization error: {e}")))?;
        println!("{out}");
    } else {
        println!("{}", reply.answer);
    }
    Ok(())
}

pub fn cmd_chat(ctx: &Context, transcript_json: bool) -> Result<(), CliError> {
    let loaded = ctx.load_table()?;
    let responder = ctx.responder(&loaded)?;
    let mut session = ChatSession::new(&responder);

    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        eprintln!("Chat de seguros ({} registros). Opciones de consulta:", loaded.table.row_count());
        eprintln!("  - Estadísticas de clientes");
        eprintln!("  - Coberturas disponibles");
        eprintln!("  - Canales de venta");
        eprintln!("  - Información sobre pólizas");
        eprintln!(":history muestra el historial, :quit termina.");
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        if interactive {
            eprint!("{}: ", ctx.settings.user_label);
            let _ = io::stderr().flush();
        }

        let mut bytes = Vec::new();
        let read = input
            .read_until(b'\n', &mut bytes)
            .map_err(|e| CliError::eval(format!("cannot read stdin: {e}")))?;
        if read == 0 {
            break;
        }
        let Ok(line) = String::from_utf8(bytes) else {
            eprintln!("warning: skipped a line that is not valid UTF-8");
            continue;
        };
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');

        match line.trim() {
            ":quit" | ":q" => break,
            ":history" => {
                write_transcript(ctx, &mut out, session.transcript())?;
                continue;
            }
            _ => {}
        }

        // Only a truly empty submission is skipped; whitespace still gets an answer
        if line.is_empty() {
            continue;
        }

        let answer = session.submit(line);
        writeln!(out, "{}: {}", ctx.settings.bot_label, answer).map_err(stdout_err)?;
        out.flush().map_err(stdout_err)?;
    }

    log::info!("chat session ended after {} turn(s)", session.transcript().len() / 2);

    if transcript_json {
        let json = serde_json::to_string_pretty(session.transcript())
            .map_err(|e| CliError::eval(format!("JSON serialization error: {e}")))?;
        writeln!(out, "{json}").map_err(stdout_err)?;
    }
    Ok(())
}

fn write_transcript(ctx: &Context, out: &mut impl Write, entries: &[Entry]) -> Result<(), CliError> {
    for entry in entries {
        writeln!(out, "{}: {}", ctx.speaker_label(entry.speaker), entry.text).map_err(stdout_err)?;
    }
    Ok(())
}

fn stdout_err(e: io::Error) -> CliError {
    CliError::write(format!("cannot write to stdout: {e}"))
}
