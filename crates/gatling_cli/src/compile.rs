//! The `gatling compile` subcommand: macro source in, flat netlist out.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use gatling_common::Interner;
use gatling_diagnostics::{DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use gatling_expand::{emit, ExpansionContext};
use gatling_hdl::parse;
use gatling_netlist::write_gates;
use gatling_source::SourceDb;

use crate::{CompileArgs, EmitFormat, GlobalArgs};

/// Runs the compile subcommand, returning the process exit code.
pub fn run(args: &CompileArgs, global: &GlobalArgs) -> Result<i32, io::Error> {
    let mut source_db = SourceDb::new();
    let (file_id, source) = match &args.source {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            (source_db.add_source(path.clone(), content.clone()), content)
        }
        None => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            (source_db.add_source("<stdin>", content.clone()), content)
        }
    };

    let interner = Interner::new();
    let sink = DiagnosticSink::new();
    let renderer = TerminalRenderer::new(global.color);

    let program = match parse(&source, file_id, &interner, &sink) {
        Ok(program) => program,
        Err(_) => {
            drain_diagnostics(&sink, &renderer, &source_db);
            return Ok(1);
        }
    };

    let mut ctx = ExpansionContext::new(&program.table, &interner);
    for request in &program.requests {
        if let Err(e) = ctx.expand_request(request) {
            eprint!("{}", renderer.render(&e.to_diagnostic(), &source_db));
            return Ok(1);
        }
    }
    let expansion = ctx.finish();

    match args.emit {
        EmitFormat::Text => {
            match &args.output {
                Some(path) => {
                    let file = File::create(path)?;
                    emit::write_text(io::BufWriter::new(file), &expansion, &interner)?;
                }
                None => {
                    let stdout = io::stdout().lock();
                    emit::write_text(stdout, &expansion, &interner)?;
                }
            }
        }
        EmitFormat::Binary => {
            let image = match emit::to_image(&expansion, &interner) {
                Ok(image) => image,
                Err(e) => {
                    eprint!("{}", renderer.render(&e.to_diagnostic(), &source_db));
                    return Ok(1);
                }
            };
            let nand_path = args.output.as_deref().unwrap_or("out.nand");
            let or_path = args.or_output.as_deref().unwrap_or("out.or");
            write_gate_file(Path::new(nand_path), &image.nands)?;
            write_gate_file(Path::new(or_path), &image.ors)?;
            if global.verbose && !global.quiet {
                eprintln!(
                    "wrote {} nand gates to {nand_path}, {} or gates to {or_path} ({} wires)",
                    image.nands.len(),
                    image.ors.len(),
                    image.num_wires
                );
            }
        }
    }

    Ok(0)
}

fn write_gate_file(path: &Path, gates: &[gatling_netlist::Gate]) -> Result<(), io::Error> {
    let file = File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    write_gates(&mut writer, gates).map_err(|e| match e {
        gatling_netlist::NetlistError::Io(io_err) => io_err,
        other => io::Error::other(other.to_string()),
    })?;
    writer.flush()
}

fn drain_diagnostics(sink: &DiagnosticSink, renderer: &TerminalRenderer, source_db: &SourceDb) {
    for diag in sink.take_all() {
        eprint!("{}", renderer.render(&diag, source_db));
    }
}
