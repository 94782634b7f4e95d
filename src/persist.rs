use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde::Serialize;
use strum::EnumCount;

use crate::{algo::QTable, error::Error, grid::Action};

/// A destination for the learned [`QTable`]
///
/// Called exactly once, when the agent terminates. Sinks only read the table.
pub trait TableSink {
    fn write(&mut self, table: &QTable) -> Result<(), Error>;
}

/// Writes the table as a NumPy `.npy` (format 1.0) array of shape `(N, N, 4)` and dtype `<f4`
///
/// Index order is `(x, y, action)`, matching [`QTable::as_slice`].
pub struct Npy<W: Write> {
    writer: W,
}

impl Npy<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write> Npy<W> {
    const MAGIC: &'static [u8] = b"\x93NUMPY\x01\x00";
    const ALIGN: usize = 64;

    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// The header dictionary, padded with spaces and a trailing newline so the data starts
    /// on an [`ALIGN`](Self::ALIGN) byte boundary
    fn header(size: usize) -> Vec<u8> {
        let dict = format!(
            "{{'descr': '<f4', 'fortran_order': False, 'shape': ({size}, {size}, {}), }}",
            Action::COUNT
        );
        // magic + u16 length + dict + '\n'
        let unpadded = Self::MAGIC.len() + 2 + dict.len() + 1;
        let pad = (Self::ALIGN - unpadded % Self::ALIGN) % Self::ALIGN;

        let mut header = dict.into_bytes();
        header.extend(std::iter::repeat(b' ').take(pad));
        header.push(b'\n');
        header
    }
}

impl<W: Write> TableSink for Npy<W> {
    fn write(&mut self, table: &QTable) -> Result<(), Error> {
        let header = Self::header(table.grid().size());
        self.writer.write_all(Self::MAGIC)?;
        self.writer.write_all(&(header.len() as u16).to_le_bytes())?;
        self.writer.write_all(&header)?;
        for value in table.as_slice() {
            self.writer.write_all(&value.to_le_bytes())?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[derive(Serialize)]
struct Row {
    x: i32,
    y: i32,
    up: f32,
    down: f32,
    left: f32,
    right: f32,
}

/// Writes one CSV row per cell: `x, y, up, down, left, right`
pub struct Csv<W: Write> {
    writer: csv::Writer<W>,
}

impl Csv<File> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl<W: Write> Csv<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, Error> {
        self.writer
            .into_inner()
            .map_err(|e| Error::Io(e.into_error()))
    }
}

impl<W: Write> TableSink for Csv<W> {
    fn write(&mut self, table: &QTable) -> Result<(), Error> {
        for cell in table.grid().cells() {
            self.writer.serialize(Row {
                x: cell.x,
                y: cell.y,
                up: table.get(cell, Action::Up),
                down: table.get(cell, Action::Down),
                left: table.get(cell, Action::Left),
                right: table.get(cell, Action::Right),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{Coord, Grid};

    use super::*;

    fn trained_table() -> QTable {
        let mut table = QTable::new(Grid::new(2), 0.5, 0.9);
        table.update(Coord::new(0, 0), Action::Right, 4.0, Coord::new(1, 0));
        table
    }

    #[test]
    fn npy_layout() {
        let table = trained_table();
        let mut sink = Npy::new(Vec::new());
        sink.write(&table).unwrap();
        let bytes = sink.into_inner();

        assert_eq!(&bytes[..8], b"\x93NUMPY\x01\x00", "Magic and version");
        let header_len = u16::from_le_bytes([bytes[8], bytes[9]]) as usize;
        let data_start = 10 + header_len;
        assert_eq!(data_start % 64, 0, "Data is aligned");

        let header = std::str::from_utf8(&bytes[10..data_start]).unwrap();
        assert!(header.contains("'descr': '<f4'"), "Header: {header}");
        assert!(header.contains("'shape': (2, 2, 4)"), "Header: {header}");
        assert!(header.ends_with('\n'), "Header ends in a newline");

        let data = &bytes[data_start..];
        assert_eq!(data.len(), 2 * 2 * 4 * 4, "One f32 per entry");
        let right = Action::Right.index() * 4;
        let value = f32::from_le_bytes(data[right..right + 4].try_into().unwrap());
        assert_eq!(value, 2.0, "Q((0,0), Right) lands at index (0, 0, 3)");
    }

    #[test]
    fn csv_rows() {
        let table = trained_table();
        let mut sink = Csv::new(Vec::new());
        sink.write(&table).unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();

        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 5, "Header plus one row per cell");
        assert_eq!(lines[0], "x,y,up,down,left,right");
        assert_eq!(lines[1], "0,0,0.0,0.0,0.0,2.0");
        assert_eq!(lines[4], "1,1,0.0,0.0,0.0,0.0");
    }
}
