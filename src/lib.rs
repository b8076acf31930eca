pub mod config;
pub mod hex_text;
pub mod segment;

#[cfg(test)]
mod test;
