pub mod passes;
pub mod plain;
pub mod shaded;
