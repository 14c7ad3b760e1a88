//! Test utilities and fixtures shared across module tests.

/// A minimal valid PCM WAV file (8 samples of silence).
///
/// Small enough to build inline, real enough for lofty to probe and
/// tag. Used wherever a test needs a taggable audio file on disk.
pub fn minimal_wav() -> Vec<u8> {
    let samples = [0u8; 8];
    let mut wav = Vec::new();

    wav.extend_from_slice(b"RIFF");
    // 4 (WAVE) + 8 + 16 (fmt chunk) + 8 + data
    wav.extend_from_slice(&(4u32 + 24 + 8 + samples.len() as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&8000u32.to_le_bytes()); // sample rate
    wav.extend_from_slice(&16000u32.to_le_bytes()); // byte rate
    wav.extend_from_slice(&2u16.to_le_bytes()); // block align
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(samples.len() as u32).to_le_bytes());
    wav.extend_from_slice(&samples);

    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_wav_is_probeable() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("probe.wav");
        std::fs::write(&path, minimal_wav()).unwrap();

        let result = lofty::probe::Probe::open(&path).unwrap().read();
        assert!(result.is_ok());
    }
}
