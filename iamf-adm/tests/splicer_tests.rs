//! WAV splicer tests.
//!
//! These tests drive the reader and splicer end-to-end over hand-built
//! ADM-BWF byte images and compare the emitted files byte for byte.

use iamf_adm::{splice_wav_files_from_adm, Bw64Reader};
use std::io::Cursor;

const IMPORTANCE_THRESHOLD: i32 = 10;

const ADM_BWF_WITH_ONE_STEREO_OBJECT: &[u8] =
    b"RIFF\xb8\x00\x00\x00WAVE\
      fmt \x10\x00\x00\x00\x01\x00\x02\x00\x01\x00\x00\x00\x04\x00\x00\x00\x04\x00\x10\x00\
      data\x08\x00\x00\x00\x01\x23\x45\x67\x89\xab\xcd\xef\
      axml\x7c\x00\x00\x00\
      <topLevel><audioObject><audioTrackUIDRef>L</audioTrackUIDRef>\
      <audioTrackUIDRef>R</audioTrackUIDRef></audioObject></topLevel>";

// The stereo output is the input with the axml chunk stripped and sizes
// recomputed.
const EXPECTED_OUTPUT_FOR_STEREO_OBJECT: &[u8] =
    b"RIFF\x2c\x00\x00\x00WAVE\
      fmt \x10\x00\x00\x00\x01\x00\x02\x00\x01\x00\x00\x00\x04\x00\x00\x00\x04\x00\x10\x00\
      data\x08\x00\x00\x00\x01\x23\x45\x67\x89\xab\xcd\xef";

// Declares a 10-byte data chunk but only 8 bytes of PCM follow.
const INVALID_WAV_WITH_INCONSISTENT_DATA_CHUNK_SIZE: &[u8] =
    b"RIFF\xb8\x00\x00\x00WAVE\
      fmt \x10\x00\x00\x00\x01\x00\x02\x00\x01\x00\x00\x00\x04\x00\x00\x00\x04\x00\x10\x00\
      axml\x7c\x00\x00\x00\
      <topLevel><audioObject><audioTrackUIDRef>L</audioTrackUIDRef>\
      <audioTrackUIDRef>R</audioTrackUIDRef></audioObject></topLevel>\
      data\x0a\x00\x00\x00\x01\x23\x45\x67\x89\xab\xcd\xef";

const ADM_BWF_WITH_ONE_STEREO_AND_ONE_MONO_OBJECT: &[u8] =
    b"RIFF\xf5\x00\x00\x00WAVE\
      fmt \x10\x00\x00\x00\x01\x00\x03\x00\x01\x00\x00\x00\x06\x00\x00\x00\x06\x00\x10\x00\
      data\x0c\x00\x00\x00\x01\x23\x45\x67\xaa\xbb\x89\xab\xcd\xef\xcc\xdd\
      axml\xbd\x00\x00\x00\
      <topLevel>\
      <audioObject>\
      <audioTrackUIDRef>L</audioTrackUIDRef>\
      <audioTrackUIDRef>R</audioTrackUIDRef>\
      </audioObject>\
      <audioObject>\
      <audioTrackUIDRef>M</audioTrackUIDRef>\
      </audioObject>\
      </topLevel>";

const EXPECTED_OUTPUT_FOR_MONO_OBJECT: &[u8] =
    b"RIFF\x28\x00\x00\x00WAVE\
      fmt \x10\x00\x00\x00\x01\x00\x01\x00\x01\x00\x00\x00\x02\x00\x00\x00\x02\x00\x10\x00\
      data\x04\x00\x00\x00\xaa\xbb\xcc\xdd";

#[test]
fn test_creates_wav_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut stream = Cursor::new(ADM_BWF_WITH_ONE_STEREO_OBJECT);
    let reader = Bw64Reader::build_from_stream(IMPORTANCE_THRESHOLD, &mut stream).unwrap();

    splice_wav_files_from_adm(dir.path(), "prefix", &reader, &mut stream).unwrap();
    assert!(dir.path().join("prefix_converted1.wav").exists());
}

#[test]
fn test_strips_axml_chunk_and_updates_chunk_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let mut stream = Cursor::new(ADM_BWF_WITH_ONE_STEREO_OBJECT);
    let reader = Bw64Reader::build_from_stream(IMPORTANCE_THRESHOLD, &mut stream).unwrap();

    splice_wav_files_from_adm(dir.path(), "prefix", &reader, &mut stream).unwrap();

    let actual = std::fs::read(dir.path().join("prefix_converted1.wav")).unwrap();
    assert_eq!(actual, EXPECTED_OUTPUT_FOR_STEREO_OBJECT);
}

#[test]
fn test_outputs_one_wav_file_per_object() {
    let dir = tempfile::tempdir().unwrap();
    let mut stream = Cursor::new(ADM_BWF_WITH_ONE_STEREO_AND_ONE_MONO_OBJECT);
    let reader = Bw64Reader::build_from_stream(IMPORTANCE_THRESHOLD, &mut stream).unwrap();

    splice_wav_files_from_adm(dir.path(), "prefix", &reader, &mut stream).unwrap();

    let stereo = std::fs::read(dir.path().join("prefix_converted1.wav")).unwrap();
    assert_eq!(stereo, EXPECTED_OUTPUT_FOR_STEREO_OBJECT);

    let mono = std::fs::read(dir.path().join("prefix_converted2.wav")).unwrap();
    assert_eq!(mono, EXPECTED_OUTPUT_FOR_MONO_OBJECT);
}

#[test]
fn test_inconsistent_data_chunk_fails_and_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut stream = Cursor::new(INVALID_WAV_WITH_INCONSISTENT_DATA_CHUNK_SIZE);
    let reader = Bw64Reader::build_from_stream(IMPORTANCE_THRESHOLD, &mut stream).unwrap();

    let result = splice_wav_files_from_adm(dir.path(), "prefix", &reader, &mut stream);
    assert!(result.is_err());
    assert!(!dir.path().join("prefix_converted1.wav").exists());
}

#[test]
fn test_zero_objects_succeeds_with_no_output() {
    // No axml chunk at all: nothing to splice.
    let mut file = Vec::new();
    file.extend_from_slice(b"RIFF");
    file.extend_from_slice(&40u32.to_le_bytes());
    file.extend_from_slice(b"WAVE");
    file.extend_from_slice(b"fmt \x10\x00\x00\x00\x01\x00\x02\x00\x01\x00\x00\x00\x04\x00\x00\x00\x04\x00\x10\x00");
    file.extend_from_slice(b"data\x04\x00\x00\x00\x01\x02\x03\x04");

    let dir = tempfile::tempdir().unwrap();
    let mut stream = Cursor::new(file);
    let reader = Bw64Reader::build_from_stream(IMPORTANCE_THRESHOLD, &mut stream).unwrap();

    splice_wav_files_from_adm(dir.path(), "prefix", &reader, &mut stream).unwrap();
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_track_count_mismatch_fails() {
    // Stereo fmt but the ADM only references one track.
    let mut file = ADM_BWF_WITH_ONE_STEREO_OBJECT.to_vec();
    let needle = b"<audioTrackUIDRef>R</audioTrackUIDRef>".len();
    let xml_start = file.len() - 124;
    file.truncate(xml_start);
    file.extend_from_slice(
        b"<topLevel><audioObject><audioTrackUIDRef>L</audioTrackUIDRef></audioObject></topLevel>",
    );
    let axml_size = (124 - needle) as u32;
    file[xml_start - 4..xml_start].copy_from_slice(&axml_size.to_le_bytes());

    let dir = tempfile::tempdir().unwrap();
    let mut stream = Cursor::new(file);
    let reader = Bw64Reader::build_from_stream(IMPORTANCE_THRESHOLD, &mut stream).unwrap();

    let result = splice_wav_files_from_adm(dir.path(), "prefix", &reader, &mut stream);
    assert!(result.is_err());
    assert!(!dir.path().join("prefix_converted1.wav").exists());
}

#[test]
fn test_reinterleaving_mono_outputs_reproduces_input_pcm() {
    // Three mono objects out of a three-channel input; interleaving the
    // three outputs frame by frame must reproduce the input data payload.
    let num_frames = 5u32;
    let channels = 3u16;
    let mut pcm = Vec::new();
    for frame in 0..num_frames {
        for channel in 0..channels {
            let sample = (frame as i16 * 10 + channel as i16).to_le_bytes();
            pcm.extend_from_slice(&sample);
        }
    }

    let xml = b"<topLevel>\
                <audioObject><audioTrackUIDRef>T0</audioTrackUIDRef></audioObject>\
                <audioObject><audioTrackUIDRef>T1</audioTrackUIDRef></audioObject>\
                <audioObject><audioTrackUIDRef>T2</audioTrackUIDRef></audioObject>\
                </topLevel>";

    let mut file = Vec::new();
    file.extend_from_slice(b"RIFF");
    file.extend_from_slice(&0u32.to_le_bytes()); // size field is not consulted
    file.extend_from_slice(b"WAVE");
    file.extend_from_slice(b"fmt ");
    file.extend_from_slice(&16u32.to_le_bytes());
    file.extend_from_slice(&1u16.to_le_bytes());
    file.extend_from_slice(&channels.to_le_bytes());
    file.extend_from_slice(&48_000u32.to_le_bytes());
    file.extend_from_slice(&(48_000u32 * 6).to_le_bytes());
    file.extend_from_slice(&6u16.to_le_bytes());
    file.extend_from_slice(&16u16.to_le_bytes());
    file.extend_from_slice(b"data");
    file.extend_from_slice(&(pcm.len() as u32).to_le_bytes());
    file.extend_from_slice(&pcm);
    file.extend_from_slice(b"axml");
    file.extend_from_slice(&(xml.len() as u32).to_le_bytes());
    file.extend_from_slice(xml);

    let dir = tempfile::tempdir().unwrap();
    let mut stream = Cursor::new(file);
    let reader = Bw64Reader::build_from_stream(IMPORTANCE_THRESHOLD, &mut stream).unwrap();
    splice_wav_files_from_adm(dir.path(), "multi", &reader, &mut stream).unwrap();

    let outputs: Vec<Vec<u8>> = (1..=3)
        .map(|k| std::fs::read(dir.path().join(format!("multi_converted{}.wav", k))).unwrap())
        .collect();

    let mut reinterleaved = Vec::new();
    for frame in 0..num_frames as usize {
        for output in &outputs {
            // 44-byte header, then 2 bytes per mono frame.
            let begin = 44 + frame * 2;
            reinterleaved.extend_from_slice(&output[begin..begin + 2]);
        }
    }
    assert_eq!(reinterleaved, pcm);
}
