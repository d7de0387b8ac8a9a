use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a generation takes its conditioning input from
///
/// Stored on disk as `"seed_image"` or a bare frame number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SourceRecord", from = "SourceRecord")]
pub enum GenerationSource {
    /// The original seed image the whole video starts from
    SeedImage,

    /// An absolute 1-based frame of the video assembled so far
    Frame(u32),
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeedImage => write!(f, "original image"),
            Self::Frame(frame) => write!(f, "frame {}", frame),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SeedImage {
    SeedImage,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum SourceRecord {
    Seed(SeedImage),
    Frame(u32),
}

impl From<GenerationSource> for SourceRecord {
    fn from(source: GenerationSource) -> Self {
        match source {
            GenerationSource::SeedImage => Self::Seed(SeedImage::SeedImage),
            GenerationSource::Frame(frame) => Self::Frame(frame),
        }
    }
}

impl From<SourceRecord> for GenerationSource {
    fn from(record: SourceRecord) -> Self {
        match record {
            SourceRecord::Seed(_) => Self::SeedImage,
            SourceRecord::Frame(frame) => Self::Frame(frame),
        }
    }
}

/// The opening generation, produced straight from the seed image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstSegment {
    pub end_frame: u32,
    pub generation_frames: u32,
}

/// A generation conditioned on the tail of the video assembled so far
///
/// Its first `overlap_with_previous` raw frames repeat frames already in the
/// timeline and are dropped before splicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationSegment {
    pub index: u32,
    pub start_frame: u32,
    pub end_frame: u32,
    pub generation_frames: u32,
    pub generation_start_frame: u32,
    pub skip_frames: u32,
    pub overlap_with_previous: u32,
}

/// One planned generation call and the final-timeline range it fills
///
/// Frame ranges are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "SegmentRecord", try_from = "SegmentRecord")]
pub enum Segment {
    First(FirstSegment),
    Continuation(ContinuationSegment),
}

impl Segment {
    /// 1-based position in the generation sequence
    pub fn index(&self) -> u32 {
        match self {
            Self::First(_) => 1,
            Self::Continuation(segment) => segment.index,
        }
    }

    pub fn start_frame(&self) -> u32 {
        match self {
            Self::First(_) => 1,
            Self::Continuation(segment) => segment.start_frame,
        }
    }

    pub fn end_frame(&self) -> u32 {
        match self {
            Self::First(segment) => segment.end_frame,
            Self::Continuation(segment) => segment.end_frame,
        }
    }

    /// Raw frames the generation call produces
    pub fn generation_frames(&self) -> u32 {
        match self {
            Self::First(segment) => segment.generation_frames,
            Self::Continuation(segment) => segment.generation_frames,
        }
    }

    pub fn generation_start_source(&self) -> GenerationSource {
        match self {
            Self::First(_) => GenerationSource::SeedImage,
            Self::Continuation(segment) => GenerationSource::Frame(segment.generation_start_frame),
        }
    }

    /// Timeline frames to skip before the conditioning frame
    pub fn skip_frames(&self) -> u32 {
        match self {
            Self::First(_) => 0,
            Self::Continuation(segment) => segment.skip_frames,
        }
    }

    pub fn overlap_with_previous(&self) -> u32 {
        match self {
            Self::First(_) => 0,
            Self::Continuation(segment) => segment.overlap_with_previous,
        }
    }

    /// Frames this segment contributes to the final video
    pub fn final_frames(&self) -> u64 {
        (u64::from(self.end_frame()) + 1).saturating_sub(u64::from(self.start_frame()))
    }

    pub fn is_first(&self) -> bool {
        matches!(self, Self::First(_))
    }
}

/// Flat on-disk shape of a segment
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SegmentRecord {
    index: u32,
    start_frame: u32,
    end_frame: u32,
    generation_frames: u32,
    generation_start_source: GenerationSource,
    skip_frames: u32,
    overlap_with_previous: u32,
}

impl From<Segment> for SegmentRecord {
    fn from(segment: Segment) -> Self {
        Self {
            index: segment.index(),
            start_frame: segment.start_frame(),
            end_frame: segment.end_frame(),
            generation_frames: segment.generation_frames(),
            generation_start_source: segment.generation_start_source(),
            skip_frames: segment.skip_frames(),
            overlap_with_previous: segment.overlap_with_previous(),
        }
    }
}

impl TryFrom<SegmentRecord> for Segment {
    type Error = String;

    fn try_from(record: SegmentRecord) -> Result<Self, Self::Error> {
        if record.end_frame < record.start_frame {
            return Err(format!(
                "segment {} ends at frame {} before it starts at frame {}",
                record.index, record.end_frame, record.start_frame
            ));
        }

        match record.generation_start_source {
            GenerationSource::SeedImage => {
                if record.index != 1 || record.start_frame != 1 {
                    return Err("only segment 1 can start from the seed image".to_string());
                }
                if record.skip_frames != 0 || record.overlap_with_previous != 0 {
                    return Err("first segment cannot skip or overlap frames".to_string());
                }
                Ok(Self::First(FirstSegment {
                    end_frame: record.end_frame,
                    generation_frames: record.generation_frames,
                }))
            }
            GenerationSource::Frame(generation_start_frame) => {
                Ok(Self::Continuation(ContinuationSegment {
                    index: record.index,
                    start_frame: record.start_frame,
                    end_frame: record.end_frame,
                    generation_frames: record.generation_frames,
                    generation_start_frame,
                    skip_frames: record.skip_frames,
                    overlap_with_previous: record.overlap_with_previous,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn continuation() -> Segment {
        Segment::Continuation(ContinuationSegment {
            index: 2,
            start_frame: 82,
            end_frame: 154,
            generation_frames: 81,
            generation_start_frame: 74,
            skip_frames: 73,
            overlap_with_previous: 8,
        })
    }

    #[test]
    fn test_first_segment_accessors() {
        let segment = Segment::First(FirstSegment { end_frame: 81, generation_frames: 81 });

        assert_eq!(segment.index(), 1);
        assert_eq!(segment.start_frame(), 1);
        assert_eq!(segment.skip_frames(), 0);
        assert_eq!(segment.overlap_with_previous(), 0);
        assert_eq!(segment.generation_start_source(), GenerationSource::SeedImage);
        assert_eq!(segment.final_frames(), 81);
        assert!(segment.is_first());
    }

    #[test]
    fn test_continuation_accessors() {
        let segment = continuation();

        assert_eq!(segment.index(), 2);
        assert_eq!(segment.generation_start_source(), GenerationSource::Frame(74));
        assert_eq!(segment.generation_start_source().to_string(), "frame 74");
        assert_eq!(segment.final_frames(), 73);
        assert!(!segment.is_first());
    }

    #[test]
    fn test_serialized_fields() {
        let value = serde_json::to_value(continuation()).unwrap();
        assert_eq!(value["index"], 2);
        assert_eq!(value["generation_start_source"], 74);
        assert_eq!(value["skip_frames"], 73);
        assert_eq!(value["overlap_with_previous"], 8);

        let first = Segment::First(FirstSegment { end_frame: 60, generation_frames: 60 });
        let value = serde_json::to_value(first).unwrap();
        assert_eq!(value["generation_start_source"], "seed_image");
        assert_eq!(value["skip_frames"], 0);
        assert_eq!(value["overlap_with_previous"], 0);
    }

    #[test]
    fn test_reads_both_sources() {
        let json = r#"{"index":1,"start_frame":1,"end_frame":81,"generation_frames":81,
            "generation_start_source":"seed_image","skip_frames":0,"overlap_with_previous":0}"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(segment, Segment::First(FirstSegment { end_frame: 81, generation_frames: 81 }));

        let json = r#"{"index":2,"start_frame":82,"end_frame":154,"generation_frames":81,
            "generation_start_source":74,"skip_frames":73,"overlap_with_previous":8}"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(segment, continuation());
    }

    #[test]
    fn test_rejects_first_segment_with_overlap() {
        let json = r#"{"index":1,"start_frame":1,"end_frame":81,"generation_frames":81,
            "generation_start_source":"seed_image","skip_frames":0,"overlap_with_previous":8}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());
    }

    #[test]
    fn test_rejects_seed_image_after_first_segment() {
        let json = r#"{"index":2,"start_frame":82,"end_frame":154,"generation_frames":81,
            "generation_start_source":"seed_image","skip_frames":0,"overlap_with_previous":0}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());
    }

    #[test]
    fn test_rejects_unknown_source() {
        let json = r#"{"index":2,"start_frame":82,"end_frame":154,"generation_frames":81,
            "generation_start_source":"previous_clip","skip_frames":73,"overlap_with_previous":8}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());
    }

    #[test]
    fn test_final_frames_at_frame_limit() {
        let segment = Segment::Continuation(ContinuationSegment {
            index: 2,
            start_frame: 0,
            end_frame: u32::MAX,
            generation_frames: 81,
            generation_start_frame: 1,
            skip_frames: 0,
            overlap_with_previous: 8,
        });
        assert_eq!(segment.final_frames(), u64::from(u32::MAX) + 1);
    }
}
