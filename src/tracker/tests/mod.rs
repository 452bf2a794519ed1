mod common;
mod sharing;
