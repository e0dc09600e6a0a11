/// Identifier bookkeeping for a presentation being written.
///
/// Every identifier the exporter hands out comes from one [`IdAllocator`]
/// owned by the document. Identifiers are read with a `next_*` call and only
/// consumed by the matching `commit_*` call, so work that fails between the
/// two leaves the counters untouched.

/// First shape id of a presentation.
pub const FIRST_SHAPE_ID: u32 = 51;
/// First slide index; slides are numbered from 1.
pub const FIRST_SLIDE_INDEX: u32 = 1;
/// First media index; media parts are numbered from 0.
pub const FIRST_MEDIA_INDEX: u32 = 0;
/// First relationship id used for media. `rId1` is the slide layout.
pub const FIRST_MEDIA_REL_ID: u32 = 4;
/// First `sldId` value in the presentation descriptor.
pub const FIRST_SLIDE_ID: u32 = 256;
/// Relationship id of slide 1 in the presentation relationships.
pub const FIRST_SLIDE_REL_ID: u32 = 4;

/// A media part number paired with the relationship id that references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaSlot {
    /// Media index (`ppt/media/image{index}.png`)
    pub index: u32,
    /// Relationship id number (`rId{rel_id}`)
    pub rel_id: u32,
}

impl MediaSlot {
    /// Relationship id as written in markup (e.g., "rId4").
    pub fn rel_id_string(&self) -> String {
        format!("rId{}", self.rel_id)
    }
}

/// Document-wide counters.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    slide_index: u32,
    shape_id: u32,
    media_index: u32,
    media_rel_id: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            slide_index: FIRST_SLIDE_INDEX,
            shape_id: FIRST_SHAPE_ID,
            media_index: FIRST_MEDIA_INDEX,
            media_rel_id: FIRST_MEDIA_REL_ID,
        }
    }

    /// Index of the slide that is (or will be) open.
    pub fn slide_index(&self) -> u32 {
        self.slide_index
    }

    /// Number of slides closed so far.
    pub fn slides_closed(&self) -> u32 {
        self.slide_index - FIRST_SLIDE_INDEX
    }

    pub(crate) fn advance_slide(&mut self) {
        self.slide_index += 1;
    }

    /// Id the next shape will get.
    pub fn next_shape_id(&self) -> u32 {
        self.shape_id
    }

    /// Consume the next shape id.
    pub(crate) fn commit_shape(&mut self) -> u32 {
        let id = self.shape_id;
        self.shape_id += 1;
        id
    }

    /// Number of media parts written so far.
    pub fn media_count(&self) -> u32 {
        self.media_index - FIRST_MEDIA_INDEX
    }

    /// Slot the next media part will get.
    pub fn next_media(&self) -> MediaSlot {
        MediaSlot {
            index: self.media_index,
            rel_id: self.media_rel_id,
        }
    }

    /// Consume `slot`, which must be the one [`next_media`](Self::next_media)
    /// returned.
    pub(crate) fn commit_media(&mut self, slot: MediaSlot) {
        debug_assert_eq!(slot, self.next_media());
        self.media_index += 1;
        self.media_rel_id += 1;
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_consume() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_shape_id(), 51);
        assert_eq!(ids.next_shape_id(), 51);
        assert_eq!(ids.commit_shape(), 51);
        assert_eq!(ids.next_shape_id(), 52);
    }

    #[test]
    fn test_media_pairs_advance_together() {
        let mut ids = IdAllocator::new();
        for n in 0..3 {
            let slot = ids.next_media();
            assert_eq!(slot, MediaSlot { index: n, rel_id: 4 + n });
            ids.commit_media(slot);
        }
        assert_eq!(ids.media_count(), 3);
        assert_eq!(ids.next_media().rel_id_string(), "rId7");
    }

    #[test]
    fn test_slides() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.slide_index(), 1);
        assert_eq!(ids.slides_closed(), 0);
        ids.advance_slide();
        assert_eq!(ids.slide_index(), 2);
        assert_eq!(ids.slides_closed(), 1);
    }
}
