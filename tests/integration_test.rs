use lzopak::codec::{CodecError, Compressor};
use lzopak::header::{Field, Header, LZOP_MAGIC};
use lzopak::method::{Method, MethodError};
use lzopak::writer::{ContainerWriter, WriteError};
use std::fs::File;
use std::io::Read;
use tempfile::NamedTempFile;

/// Stand-in for the external LZO1X service: returns the input verbatim.
struct StoredCompressor;

impl Compressor for StoredCompressor {
    fn compress(&self, data: &[u8], _level: u8) -> Result<Vec<u8>, CodecError> {
        Ok(data.to_vec())
    }
}

/// Always fails, for exercising mid-write error paths.
struct FailingCompressor;

impl Compressor for FailingCompressor {
    fn compress(&self, _data: &[u8], _level: u8) -> Result<Vec<u8>, CodecError> {
        Err(CodecError::Compression("service unavailable".to_string()))
    }
}

fn write_container(file_name: &str, level: u8, data: &[u8], mtime: i64) -> Vec<u8> {
    let mut writer = ContainerWriter::new(Vec::new(), StoredCompressor);
    writer.write_with_mtime(file_name, level, data, mtime).unwrap();
    writer.into_inner()
}

// ── Method / level policy ────────────────────────────────────────────────────

#[test]
fn levels_two_through_six_normalize_to_lzo1x1_level_five() {
    for level in 2..=6 {
        let (method, normalized) = Method::for_level(level).unwrap();
        assert_eq!(method, Method::Lzo1x1);
        assert_eq!(normalized, 5);
    }
}

#[test]
fn levels_seven_through_nine_select_lzo1x999_unchanged() {
    for level in 7..=9 {
        let (method, normalized) = Method::for_level(level).unwrap();
        assert_eq!(method, Method::Lzo1x999);
        assert_eq!(normalized, level);
    }
}

#[test]
fn level_one_is_unsupported_and_out_of_range_levels_are_invalid() {
    assert!(matches!(
        Method::for_level(1).unwrap_err(),
        MethodError::UnsupportedMethod(1)
    ));
    assert!(matches!(
        Method::for_level(0).unwrap_err(),
        MethodError::InvalidLevel(0)
    ));
    assert!(matches!(
        Method::for_level(10).unwrap_err(),
        MethodError::InvalidLevel(10)
    ));
}

// ── End-to-end container layout ──────────────────────────────────────────────

#[test]
fn container_layout_per_level() {
    let data = "Hello World\n".repeat(100);
    let mtime = 1_700_000_000i64;

    let cases: [(u8, u8, u8); 8] = [
        (2, 2, 5),
        (3, 2, 5),
        (4, 2, 5),
        (5, 2, 5),
        (6, 2, 5),
        (7, 3, 7),
        (8, 3, 8),
        (9, 3, 9),
    ];

    for (requested, method, level) in cases {
        let bytes = write_container("lzoptest", requested, data.as_bytes(), mtime);

        assert_eq!(&bytes[0..9], &LZOP_MAGIC);
        assert_eq!(&bytes[9..11], &[0x10, 0x30]);
        assert_eq!(bytes[15], method, "method byte for level {requested}");
        assert_eq!(bytes[16], level, "level byte for level {requested}");
        assert_eq!(&bytes[25..29], &(mtime as u32).to_be_bytes());

        // Cross-check the literal offsets against the layout table.
        let header = Header::read(&bytes[LZOP_MAGIC.len()..]).unwrap();
        let base = LZOP_MAGIC.len();
        assert_eq!(base + header.field_offset(Field::Method).unwrap(), 15);
        assert_eq!(base + header.field_offset(Field::MtimeLow).unwrap(), 25);
        assert_eq!(header.mtime_low as i64, mtime);
        assert_eq!(header.mtime_high, 0);
        assert_eq!(header.file_name, b"lzoptest");
    }
}

#[test]
fn magic_prefix_is_independent_of_inputs() {
    let a = write_container("one", 3, b"some data", 0);
    let b = write_container("another-name", 9, b"entirely different payload", i64::MAX);
    assert_eq!(&a[0..9], &b[0..9]);
    assert_eq!(&a[0..9], &LZOP_MAGIC);
}

#[test]
fn payload_follows_header_verbatim() {
    let data = b"payload bytes, no framing";
    let bytes = write_container("member", 5, data, 42);

    let header = Header::read(&bytes[LZOP_MAGIC.len()..]).unwrap();
    let payload_start = LZOP_MAGIC.len() + header.encoded_len();
    assert_eq!(&bytes[payload_start..], data);
}

#[test]
fn archive_suffix_is_stripped_from_recorded_name() {
    for (input, recorded) in [
        ("lzoptest.lzo", &b"lzoptest"[..]),
        ("data.tar.lzop", &b"data.tar"[..]),
        ("notes.txt", &b"notes.txt"[..]),
    ] {
        let bytes = write_container(input, 3, b"x", 0);
        let header = Header::read(&bytes[LZOP_MAGIC.len()..]).unwrap();
        assert_eq!(header.file_name, recorded, "name recorded for {input}");
        assert_eq!(header.file_name_length as usize, recorded.len());
    }
}

#[test]
fn mtime_high_word_is_set_past_2038() {
    let bytes = write_container("future", 3, b"x", 0x1_0000_0002);
    let header = Header::read(&bytes[LZOP_MAGIC.len()..]).unwrap();
    assert_eq!(header.mtime_low, 2);
    assert_eq!(header.mtime_high, 1);
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[test]
fn rejected_levels_leave_the_sink_empty() {
    for level in [0, 1, 10] {
        let mut writer = ContainerWriter::new(Vec::new(), StoredCompressor);
        let err = writer.write_with_mtime("name", level, b"data", 0).unwrap_err();
        assert!(matches!(err, WriteError::Method(_)), "level {level}");
        assert!(writer.into_inner().is_empty(), "level {level}");
    }
}

#[test]
fn compressor_failure_leaves_magic_and_header_flushed() {
    let mut writer = ContainerWriter::new(Vec::new(), FailingCompressor);
    let err = writer.write_with_mtime("member", 5, b"data", 0).unwrap_err();
    assert!(matches!(err, WriteError::Codec(_)));

    // The partial container (magic + header, no payload) stays in the sink.
    let bytes = writer.into_inner();
    assert_eq!(&bytes[0..9], &LZOP_MAGIC);
    let header = Header::read(&bytes[LZOP_MAGIC.len()..]).unwrap();
    assert_eq!(bytes.len(), LZOP_MAGIC.len() + header.encoded_len());
}

// ── File sink ────────────────────────────────────────────────────────────────

#[test]
fn writes_a_container_file() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().to_path_buf();

    let data = "Hello World\n".repeat(100);
    {
        let file = File::create(&path).unwrap();
        let mut writer = ContainerWriter::new(file, StoredCompressor);
        writer.write("lzoptest.lzo", 3, data.as_bytes()).unwrap();
    }

    let mut bytes = Vec::new();
    File::open(&path).unwrap().read_to_end(&mut bytes).unwrap();

    assert_eq!(&bytes[0..9], &LZOP_MAGIC);
    let header = Header::read(&bytes[LZOP_MAGIC.len()..]).unwrap();
    assert_eq!(header.method, 2);
    assert_eq!(header.level, 5);
    assert_eq!(header.file_name, b"lzoptest");
    assert_eq!(
        bytes.len(),
        LZOP_MAGIC.len() + header.encoded_len() + data.len()
    );
}
