//! Emitters for finished expansions: mnemonic text and binary gate files.
//!
//! The text format is one primitive instantiation per line, wires as decimal
//! ids except for wires bound to an outermost request's formal arguments,
//! which print as their source names. The binary format is the simulator's:
//! per gate kind, 32-bit little-endian `(in1, in2, out)` triples terminated
//! by the end sentinel.

use std::collections::HashMap;
use std::io::{self, Write};

use gatling_common::{Ident, Interner};
use gatling_netlist::{Gate, NetlistImage, Wire};

use crate::context::Expansion;
use crate::errors::ExpandError;

/// Writes the expansion as mnemonic text, one gate record per line.
pub fn write_text<W: Write>(
    mut writer: W,
    expansion: &Expansion,
    interner: &Interner,
) -> io::Result<()> {
    let names: HashMap<Wire, Ident> = expansion.named.iter().copied().collect();
    for record in &expansion.records {
        write!(writer, "{}", interner.resolve(record.name))?;
        for &wire in &record.args {
            match names.get(&wire) {
                Some(&name) => write!(writer, " {}", interner.resolve(name))?,
                None => write!(writer, " {wire}")?,
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Converts the expansion into a [`NetlistImage`] for binary emission.
///
/// Primitive names map onto the two gate kinds case-insensitively
/// (`nand`/`or`); anything else, or a record without exactly two inputs and
/// one output, is an error: the binary format has nowhere to put it.
pub fn to_image(expansion: &Expansion, interner: &Interner) -> Result<NetlistImage, ExpandError> {
    let mut nands = Vec::new();
    let mut ors = Vec::new();

    for record in &expansion.records {
        let name = interner.resolve(record.name);
        let target = if name.eq_ignore_ascii_case("nand") {
            &mut nands
        } else if name.eq_ignore_ascii_case("or") {
            &mut ors
        } else {
            return Err(ExpandError::UnknownPrimitive {
                name: name.to_string(),
            });
        };
        if record.args.len() != 3 {
            return Err(ExpandError::BadPrimitiveShape {
                name: name.to_string(),
                got: record.args.len(),
            });
        }
        target.push(Gate::new(record.args[0], record.args[1], record.args[2]));
    }

    Ok(NetlistImage::from_gates(nands, ors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExpansionContext;
    use gatling_diagnostics::DiagnosticSink;
    use gatling_hdl::parse;
    use gatling_source::FileId;

    fn compile(source: &str) -> (Expansion, Interner) {
        let interner = Interner::new();
        let sink = DiagnosticSink::new();
        let program = parse(source, FileId::from_raw(0), &interner, &sink)
            .unwrap_or_else(|_| panic!("parse failed: {:?}", sink.diagnostics()));
        let mut ctx = ExpansionContext::new(&program.table, &interner);
        for request in &program.requests {
            ctx.expand_request(request).expect("expansion failed");
        }
        (ctx.finish(), interner)
    }

    const AND2: &str = "\
Gate Nand
Inputs a b
Outputs q
Macro Not
Inputs a
Outputs q
Sequential
Begin
Nand a a q
End
Macro And2
Inputs a b
Outputs q
Intermediates nq
Sequential
Begin
Nand a b nq
Not nq q
End
And2 x y out
";

    #[test]
    fn text_uses_names_for_outermost_formals() {
        let (exp, interner) = compile(AND2);
        let mut out = Vec::new();
        write_text(&mut out, &exp, &interner).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Nand x y 2\nNand 2 2 out\n");
    }

    #[test]
    fn text_names_every_terminal_wire() {
        let source = "\
Gate Or
Inputs a b
Outputs q
Or x y q
";
        let (exp, interner) = compile(source);
        let mut out = Vec::new();
        write_text(&mut out, &exp, &interner).unwrap();
        let text = String::from_utf8(out).unwrap();
        // All three wires belong to the request, so all print by name.
        assert_eq!(text, "Or x y q\n");
    }

    #[test]
    fn image_partitions_by_kind() {
        let source = "\
Gate Nand
Inputs a b
Outputs q
Gate Or
Inputs a b
Outputs q
Nand a b x
Or c d y
Nand e f z
";
        let (exp, interner) = compile(source);
        let image = to_image(&exp, &interner).unwrap();
        assert_eq!(image.nands.len(), 2);
        assert_eq!(image.ors.len(), 1);
        assert_eq!(image.num_wires, exp.num_wires);
    }

    #[test]
    fn image_accepts_any_name_case() {
        let source = "\
Gate NAND
Inputs a b
Outputs q
NAND a b q
";
        let (exp, interner) = compile(source);
        let image = to_image(&exp, &interner).unwrap();
        assert_eq!(image.nands.len(), 1);
    }

    #[test]
    fn image_rejects_unknown_primitive() {
        let source = "\
Gate Xor
Inputs a b
Outputs q
Xor a b q
";
        let (exp, interner) = compile(source);
        let err = to_image(&exp, &interner).unwrap_err();
        assert!(matches!(err, ExpandError::UnknownPrimitive { .. }));
    }

    #[test]
    fn image_rejects_wrong_shape() {
        let source = "\
Gate Nand
Inputs a b c
Outputs q
Nand w x y z
";
        let (exp, interner) = compile(source);
        let err = to_image(&exp, &interner).unwrap_err();
        assert!(matches!(err, ExpandError::BadPrimitiveShape { got: 4, .. }));
    }

    #[test]
    fn image_binary_roundtrip() {
        let (exp, interner) = compile(AND2);
        let image = to_image(&exp, &interner).unwrap();
        let mut bytes = Vec::new();
        gatling_netlist::write_gates(&mut bytes, &image.nands).unwrap();
        let back = gatling_netlist::read_gates(&bytes[..]).unwrap();
        assert_eq!(back, image.nands);
    }
}
