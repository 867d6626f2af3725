/// Per-lane validity for a 32-bit SuperSpeed stream word (one bit per byte).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ByteLanes(u8);

impl ByteLanes {
    pub const LANES: u32 = 4;
    pub const NONE: ByteLanes = ByteLanes(0);
    pub const ALL: ByteLanes = ByteLanes(0b1111);

    /// Bits above the fourth lane are dropped.
    pub const fn new(mask: u8) -> Self {
        Self(mask & Self::ALL.0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Every byte lane carries data.
    pub const fn all(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// At least one byte lane carries data.
    pub const fn any(self) -> bool {
        self.0 != 0
    }

    /// Lanes that were valid in `previous` and are not valid in `self`.
    pub const fn fell_from(self, previous: ByteLanes) -> ByteLanes {
        ByteLanes(previous.0 & !self.0)
    }
}

/// One step of a stream interface: data word plus framing markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StreamWord {
    pub valid: ByteLanes,
    pub first: bool,
    pub last: bool,
    pub data: u32,
}

impl StreamWord {
    pub const IDLE: StreamWord = StreamWord {
        valid: ByteLanes::NONE,
        first: false,
        last: false,
        data: 0,
    };
}
