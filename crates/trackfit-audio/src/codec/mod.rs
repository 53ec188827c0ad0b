//! Media I/O boundary: decoding files into tracks and writing tracks as WAV.
//!
//! WAV input and all output go through `hound`; compressed formats are decoded
//! with `symphonia`. Channel and rate conversion for callers that must match
//! formats before mixing live here too. Nothing in the reconciler depends on
//! this module.

mod channels;
mod decode;
mod encode;
mod resample;

#[cfg(test)]
mod tests;

// Re-export public API
pub use channels::convert_channels;
pub use decode::{
    decode_media, decode_path, decode_wav_bytes, decode_wav_reader, is_supported,
    COMPRESSED_EXTENSIONS, WAV_EXTENSIONS,
};
pub use encode::{encode_wav, encode_wav_to_vec, pcm_hash, sample_to_pcm16, SampleEncoding};
pub use resample::resample;
