#![cfg(test)]

mod util;

mod branch;
mod call;
mod flags;
mod image;
mod io;
mod load_store;
mod progs;
mod trap;
