use std::{
    fs::{File, OpenOptions},
    io::{BufWriter, Write},
    path::Path,
};

use nalgebra::Vector2;

pub fn open_create_file<P>(path: P) -> Result<File, std::io::Error>
where
    P: AsRef<Path>,
{
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

/// Save RGB `buffer` as binary PPM
pub fn write_ppm<P>(path: P, resolution: Vector2<u16>, buffer: &[u8]) -> Result<(), std::io::Error>
where
    P: AsRef<Path>,
{
    let file = open_create_file(path)?;
    let mut writer = BufWriter::new(file);
    write!(writer, "P6\n{} {}\n255\n", resolution.x, resolution.y)?;
    writer.write_all(buffer)?;
    writer.flush()
}
