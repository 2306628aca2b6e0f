//! Stroke checkpoint persistence.
//!
//! Checkpoint format: little-endian, a 4-byte signed stroke count
//! followed by one 8-byte signed position per stroke. No header, no
//! version, no checksum. Only positions survive a round-trip; the
//! similarity and cluster fields reset to their defaults on load and
//! the caller re-attaches the waveform the positions refer to.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::{Error, Result};
use keysift_core::{KeyStroke, StrokeCollection};

/// Writes stroke positions to a checkpoint file.
pub fn save_strokes<P: AsRef<Path>>(path: P, strokes: &StrokeCollection) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let count = i32::try_from(strokes.len()).map_err(|_| {
        Error::InvalidFormat(format!(
            "{} strokes exceed the 32-bit count field",
            strokes.len()
        ))
    })?;
    writer.write_all(&count.to_le_bytes())?;
    for stroke in &strokes.strokes {
        writer.write_all(&stroke.position.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads stroke positions from a checkpoint file.
pub fn load_strokes<P: AsRef<Path>>(path: P) -> Result<StrokeCollection> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    if data.len() < 4 {
        return Err(Error::InvalidFormat("missing stroke count".to_string()));
    }
    let count = i32::from_le_bytes(data[..4].try_into().unwrap());
    if count < 0 {
        return Err(Error::InvalidFormat(format!(
            "negative stroke count {count}"
        )));
    }

    let count = count as usize;
    let expected = 4 + count * 8;
    if data.len() != expected {
        return Err(Error::InvalidFormat(format!(
            "expected {expected} bytes for {count} strokes, found {}",
            data.len()
        )));
    }

    let mut strokes = StrokeCollection::with_capacity(count);
    for chunk in data[4..].chunks_exact(8) {
        let position = i64::from_le_bytes(chunk.try_into().unwrap());
        strokes.push(KeyStroke::at(position));
    }
    Ok(strokes)
}

/// Writes strokes as CSV (`index,position,avg_cc,cluster_id`).
pub fn write_strokes_csv<P: AsRef<Path>>(path: P, strokes: &StrokeCollection) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "index,position,avg_cc,cluster_id")?;
    for (index, stroke) in strokes.strokes.iter().enumerate() {
        writeln!(
            writer,
            "{},{},{},{}",
            index, stroke.position, stroke.avg_cc, stroke.cluster_id
        )?;
    }
    writer.flush()?;
    Ok(())
}
