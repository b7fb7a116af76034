//! Block type data

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! blocks {
    ($($name:ident = $id:literal),* $(,)?) => {
        /// Block type stored in one voxel - exactly 1 byte
        #[repr(u8)]
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Block {
            #[default]
            $($name = $id),*
        }

        impl Block {
            /// Every block type in id order
            pub const ALL: &'static [Block] = &[$(Block::$name),*];

            /// Canonical display name
            pub fn name(self) -> &'static str {
                match self {
                    $(Block::$name => stringify!($name)),*
                }
            }
        }
    };
}

blocks! {
    Air = 0,
    Stone = 1,
    Grass = 2,
    Dirt = 3,
    Cobblestone = 4,
    Plank = 5,
    Sapling = 6,
    Admincrete = 7,
    Water = 8,
    StillWater = 9,
    Lava = 10,
    StillLava = 11,
    Sand = 12,
    Gravel = 13,
    GoldOre = 14,
    IronOre = 15,
    Coal = 16,
    Log = 17,
    Leaves = 18,
    Sponge = 19,
    Glass = 20,
    Red = 21,
    Orange = 22,
    Yellow = 23,
    Lime = 24,
    Green = 25,
    Teal = 26,
    Aqua = 27,
    Cyan = 28,
    Blue = 29,
    Indigo = 30,
    Violet = 31,
    Magenta = 32,
    Pink = 33,
    Black = 34,
    Gray = 35,
    White = 36,
    YellowFlower = 37,
    RedFlower = 38,
    BrownMushroom = 39,
    RedMushroom = 40,
    Gold = 41,
    Iron = 42,
    DoubleStair = 43,
    Stair = 44,
    Brick = 45,
    Tnt = 46,
    Books = 47,
    MossyRocks = 48,
    Obsidian = 49,
}

/// Alternate names accepted by [`Block::parse`]
const ALIASES: &[(&str, Block)] = &[
    ("none", Block::Air),
    ("nothing", Block::Air),
    ("empty", Block::Air),
    ("rock", Block::Stone),
    ("cobble", Block::Cobblestone),
    ("wood", Block::Plank),
    ("planks", Block::Plank),
    ("bedrock", Block::Admincrete),
    ("adminium", Block::Admincrete),
    ("coalore", Block::Coal),
    ("trunk", Block::Log),
    ("leaf", Block::Leaves),
    ("purple", Block::Indigo),
    ("grey", Block::Gray),
    ("slab", Block::Stair),
    ("doubleslab", Block::DoubleStair),
    ("bricks", Block::Brick),
    ("bookshelf", Block::Books),
    ("mossy", Block::MossyRocks),
    ("mossycobble", Block::MossyRocks),
];

impl Block {
    /// Number of defined block types
    pub const COUNT: usize = Self::ALL.len();

    /// Raw byte id
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Block for a raw id, None if undefined
    pub fn from_id(id: u8) -> Option<Block> {
        Self::ALL.get(id as usize).copied()
    }

    /// Parse a block from its name, an alias, or its numeric id (case-insensitive)
    pub fn parse(text: &str) -> Option<Block> {
        let text = text.trim();
        if let Ok(id) = text.parse::<u8>() {
            return Self::from_id(id);
        }
        let lower = text.to_ascii_lowercase().replace(['_', '-', ' '], "");
        Self::ALL
            .iter()
            .copied()
            .find(|b| b.name().eq_ignore_ascii_case(&lower))
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == lower)
                    .map(|(_, b)| *b)
            })
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Block {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Block::parse(s).ok_or_else(|| s.to_string())
    }
}

/// Fixed-size membership set over all 256 block ids
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BlockSet {
    bits: [u64; 4],
}

impl BlockSet {
    pub const EMPTY: BlockSet = BlockSet { bits: [0; 4] };

    pub fn insert(&mut self, block: Block) {
        let id = block.id() as usize;
        self.bits[id / 64] |= 1 << (id % 64);
    }

    pub fn contains(&self, block: Block) -> bool {
        let id = block.id() as usize;
        self.bits[id / 64] & (1 << (id % 64)) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Members in id order
    pub fn iter(&self) -> impl Iterator<Item = Block> + '_ {
        Block::ALL.iter().copied().filter(|b| self.contains(*b))
    }
}

impl Default for BlockSet {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl FromIterator<Block> for BlockSet {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        let mut set = BlockSet::EMPTY;
        for block in iter {
            set.insert(block);
        }
        set
    }
}

impl fmt::Debug for BlockSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
