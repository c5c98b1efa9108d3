pub mod hash;
pub mod str;
pub mod yaml;
