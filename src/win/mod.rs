mod win_impl;
pub use win_impl::SendInputSink;
