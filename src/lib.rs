pub mod checksum;
pub mod codec;
pub mod header;
pub mod method;
pub mod writer;

pub use checksum::ChecksumKind;
pub use codec::{CodecError, Compressor};
pub use header::{Header, HeaderError, LZOP_MAGIC};
pub use method::{Method, MethodError};
pub use writer::{ContainerWriter, WriteError};
