pub type CmdResult<T> = wordswap::Result<(T, i32)>;

pub mod replace;
