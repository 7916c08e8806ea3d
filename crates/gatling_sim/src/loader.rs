//! Gate-file loading for the simulator.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use gatling_netlist::{read_gates, Gate, NetlistImage};

use crate::error::SimError;

/// Loads the NAND and OR gate files into a [`NetlistImage`].
///
/// Either file may be absent (`None`), meaning zero gates of that kind.
/// Any format error (the malformed sentinel, a truncated triple, EOF
/// before the end sentinel) fails the load before simulation begins. The
/// image's wire count becomes one more than the largest index referenced
/// across both files.
pub fn load_image(
    nand_path: Option<&Path>,
    or_path: Option<&Path>,
) -> Result<NetlistImage, SimError> {
    let nands = match nand_path {
        Some(path) => load_gate_file(path)?,
        None => Vec::new(),
    };
    let ors = match or_path {
        Some(path) => load_gate_file(path)?,
        None => Vec::new(),
    };
    Ok(NetlistImage::from_gates(nands, ors))
}

fn load_gate_file(path: &Path) -> Result<Vec<Gate>, SimError> {
    let file = File::open(path).map_err(|e| SimError::Load {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    read_gates(BufReader::new(file)).map_err(|e| SimError::Load {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatling_netlist::{write_gates, Wire, END_SENTINEL};

    fn w(i: u32) -> Wire {
        Wire::from_raw(i)
    }

    fn write_file(dir: &tempfile::TempDir, name: &str, gates: &[Gate]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let file = File::create(&path).unwrap();
        write_gates(file, gates).unwrap();
        path
    }

    #[test]
    fn load_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let nand = write_file(&dir, "a.nand", &[Gate::new(w(0), w(1), w(2))]);
        let or = write_file(&dir, "a.or", &[Gate::new(w(2), w(3), w(9))]);
        let image = load_image(Some(&nand), Some(&or)).unwrap();
        assert_eq!(image.nands.len(), 1);
        assert_eq!(image.ors.len(), 1);
        assert_eq!(image.num_wires, 10);
    }

    #[test]
    fn missing_or_file_means_no_or_gates() {
        let dir = tempfile::tempdir().unwrap();
        let nand = write_file(&dir, "a.nand", &[Gate::new(w(0), w(0), w(1))]);
        let image = load_image(Some(&nand), None).unwrap();
        assert!(image.ors.is_empty());
        assert_eq!(image.num_wires, 2);
    }

    #[test]
    fn nonexistent_file_is_load_error() {
        let err = load_image(Some(Path::new("/no/such/file.nand")), None).unwrap_err();
        assert!(matches!(err, SimError::Load { .. }));
    }

    #[test]
    fn truncated_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.nand");
        // Two values, then nothing: no complete triple, no end sentinel.
        let bytes: Vec<u8> = [0u32, 1u32]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        std::fs::write(&path, bytes).unwrap();
        let err = load_image(Some(&path), None).unwrap_err();
        assert!(matches!(err, SimError::Load { .. }));
    }

    #[test]
    fn empty_netlist_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.nand");
        std::fs::write(&path, END_SENTINEL.to_le_bytes()).unwrap();
        let image = load_image(Some(&path), None).unwrap();
        assert_eq!(image.gate_count(), 0);
        assert_eq!(image.num_wires, 0);
    }
}
