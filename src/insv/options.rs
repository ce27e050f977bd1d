//! Which frames to decode.

use std::collections::HashSet;

use super::FrameType;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOptions {
    /// Optional frame types to decode in addition to the default ones.
    pub include: HashSet<FrameType>,
    /// Only decode frames with this type code.
    pub frame_type: Option<u8>,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also decode `frame_type`.
    pub fn include(mut self, frame_type: FrameType) -> Self {
        self.include.insert(frame_type);
        self
    }

    pub fn include_all(mut self, frame_types: impl IntoIterator<Item = FrameType>) -> Self {
        self.include.extend(frame_types);
        self
    }

    /// Only decode frames with type code `code`.
    pub fn frame_type(mut self, code: u8) -> Self {
        self.frame_type = Some(code);
        self
    }

    /// Returns `true` if `frame_type` should be decoded:
    /// enabled by default or explicitly included,
    /// and matching the type filter if one is set.
    pub fn is_enabled(&self, frame_type: &FrameType) -> bool {
        let selected = frame_type.default_enabled() || self.include.contains(frame_type);
        let matches = match self.frame_type {
            Some(code) => frame_type.code() == Some(code),
            None => true,
        };
        selected && matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled() {
        let opts = ParseOptions::new();
        assert!(opts.is_enabled(&FrameType::Gyro));
        assert!(opts.is_enabled(&FrameType::Info));
        assert!(!opts.is_enabled(&FrameType::Magnetic));
        assert!(!opts.is_enabled(&FrameType::Unknown(99)));
        assert!(!opts.is_enabled(&FrameType::Raw));

        let opts = ParseOptions::new().include(FrameType::Pos);
        assert!(opts.is_enabled(&FrameType::Pos));

        // filter and inclusion both apply
        let opts = ParseOptions::new().frame_type(20);
        assert!(!opts.is_enabled(&FrameType::Pos));
        assert!(!opts.is_enabled(&FrameType::Gyro));
        let opts = opts.include(FrameType::Pos);
        assert!(opts.is_enabled(&FrameType::Pos));
    }
}
