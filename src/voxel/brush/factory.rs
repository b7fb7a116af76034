//! Brush argument parsing and descriptors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::NoiseDefaults;
use crate::session::Actor;
use crate::voxel::block::Block;
use super::noise_family::NoiseBrush;
use super::pattern::{CheckeredBrush, RainbowInstance};
use super::random::RandomBrush;
use super::replace::ReplaceBrush;
use super::solid::SolidBrush;
use super::{BrushError, BrushInstance};

/// Largest weight a single block may carry
pub const MAX_RATIO: u32 = 1000;

/// Most blocks one brush may be configured with
pub const MAX_BRUSH_BLOCKS: usize = 64;

/// Brush kinds actors can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrushKind {
    Solid,
    Random,
    Replace,
    ReplaceNot,
    Marbled,
    Cloudy,
    Checkered,
    Rainbow,
}

/// One block argument with its optional weight, written `name` or `name/ratio`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockArg {
    pub block: Block,
    pub ratio: Option<u32>,
}

impl BlockArg {
    pub fn new(block: Block) -> Self {
        Self { block, ratio: None }
    }

    pub fn weighted(block: Block, ratio: u32) -> Self {
        Self { block, ratio: Some(ratio) }
    }

    /// Parse `name` or `name/ratio`
    pub fn parse(token: &str) -> Result<Self, BrushError> {
        let (name, ratio) = match token.split_once('/') {
            Some((name, ratio)) => (name, Some(ratio)),
            None => (token, None),
        };
        let block = Block::parse(name).ok_or_else(|| BrushError::UnknownBlock(name.to_string()))?;
        let ratio = match ratio {
            None => None,
            Some(text) => {
                let value: i64 = text
                    .trim()
                    .parse()
                    .map_err(|_| BrushError::MalformedArgument(token.to_string()))?;
                if !(1..=MAX_RATIO as i64).contains(&value) {
                    return Err(BrushError::RatioOutOfRange { block, ratio: value });
                }
                Some(value as u32)
            }
        };
        Ok(Self { block, ratio })
    }

    /// Weight, defaulting to 1
    pub fn weight(&self) -> u32 {
        self.ratio.unwrap_or(1)
    }
}

impl fmt::Display for BlockArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ratio {
            Some(ratio) if ratio != 1 => write!(f, "{}/{}", self.block, ratio),
            _ => write!(f, "{}", self.block),
        }
    }
}

/// Arguments split into block tokens and `key=value` options
pub(crate) struct ParsedArgs {
    pub blocks: Vec<BlockArg>,
    pub options: Vec<(String, String)>,
}

impl ParsedArgs {
    fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, BrushError> {
        let mut blocks = Vec::new();
        let mut options = Vec::new();
        for token in args {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }
            match token.split_once('=') {
                Some((key, value)) => options.push((key.trim().to_ascii_lowercase(), value.trim().to_string())),
                None => blocks.push(BlockArg::parse(token)?),
            }
        }
        if blocks.len() > MAX_BRUSH_BLOCKS {
            return Err(BrushError::TooManyBlocks { max: MAX_BRUSH_BLOCKS, got: blocks.len() });
        }
        Ok(Self { blocks, options })
    }

    /// Reject weights on brushes that place blocks without proportions
    fn unweighted(&self) -> Result<Vec<Block>, BrushError> {
        match self.blocks.iter().find(|b| b.ratio.is_some()) {
            Some(arg) => Err(BrushError::MalformedArgument(arg.to_string())),
            None => Ok(self.blocks.iter().map(|b| b.block).collect()),
        }
    }

    fn no_options(&self) -> Result<(), BrushError> {
        match self.options.first() {
            Some((key, value)) => Err(BrushError::MalformedArgument(format!("{key}={value}"))),
            None => Ok(()),
        }
    }

    fn at_most(blocks: Vec<Block>, max: usize) -> Result<Vec<Block>, BrushError> {
        if blocks.len() > max {
            return Err(BrushError::TooManyBlocks { max, got: blocks.len() });
        }
        Ok(blocks)
    }
}

/// Configured brush, reusable across edits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Brush {
    Solid(SolidBrush),
    Random(RandomBrush),
    Replace(ReplaceBrush),
    ReplaceNot(ReplaceBrush),
    Marbled(NoiseBrush),
    Cloudy(NoiseBrush),
    Checkered(CheckeredBrush),
    Rainbow,
}

impl Brush {
    /// Plain brush placing one block
    pub fn solid(block: Block) -> Self {
        Brush::Solid(SolidBrush { primary: Some(block), secondary: None })
    }

    pub fn kind(&self) -> BrushKind {
        match self {
            Brush::Solid(_) => BrushKind::Solid,
            Brush::Random(_) => BrushKind::Random,
            Brush::Replace(_) => BrushKind::Replace,
            Brush::ReplaceNot(_) => BrushKind::ReplaceNot,
            Brush::Marbled(_) => BrushKind::Marbled,
            Brush::Cloudy(_) => BrushKind::Cloudy,
            Brush::Checkered(_) => BrushKind::Checkered,
            Brush::Rainbow => BrushKind::Rainbow,
        }
    }

    /// Fresh per-edit instance of this configuration
    pub fn instance(&self) -> Box<dyn BrushInstance> {
        match self {
            Brush::Solid(b) => Box::new(b.instance()),
            Brush::Random(b) => Box::new(b.instance()),
            Brush::Replace(b) => Box::new(b.instance(false)),
            Brush::ReplaceNot(b) => Box::new(b.instance(true)),
            Brush::Marbled(b) | Brush::Cloudy(b) => Box::new(b.instance()),
            Brush::Checkered(b) => Box::new(b.instance()),
            Brush::Rainbow => Box::new(RainbowInstance),
        }
    }

    pub fn description(&self) -> String {
        self.instance().description()
    }
}

impl BrushKind {
    pub const ALL: [BrushKind; 8] = [
        BrushKind::Solid,
        BrushKind::Random,
        BrushKind::Replace,
        BrushKind::ReplaceNot,
        BrushKind::Marbled,
        BrushKind::Cloudy,
        BrushKind::Checkered,
        BrushKind::Rainbow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BrushKind::Solid => "Normal",
            BrushKind::Random => "Random",
            BrushKind::Replace => "Replace",
            BrushKind::ReplaceNot => "ReplaceNot",
            BrushKind::Marbled => "Marbled",
            BrushKind::Cloudy => "Cloudy",
            BrushKind::Checkered => "Checkered",
            BrushKind::Rainbow => "Rainbow",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            BrushKind::Solid => &["normal", "solid", "default"],
            BrushKind::Random => &["random"],
            BrushKind::Replace => &["replace", "r"],
            BrushKind::ReplaceNot => &["replacenot", "rn"],
            BrushKind::Marbled => &["marbled", "marble"],
            BrushKind::Cloudy => &["cloudy", "clouds"],
            BrushKind::Checkered => &["checkered", "checker"],
            BrushKind::Rainbow => &["rainbow"],
        }
    }

    /// Look up a brush kind by name or alias (case-insensitive)
    pub fn parse(name: &str) -> Result<BrushKind, BrushError> {
        let lower = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.aliases().contains(&lower.as_str()))
            .ok_or_else(|| BrushError::UnknownBrush(name.to_string()))
    }

    /// Parse actor arguments into a reusable descriptor using default noise settings
    pub fn make_brush<S: AsRef<str>>(self, actor: &dyn Actor, args: &[S]) -> Result<Brush, BrushError> {
        self.make_brush_with(actor, args, &NoiseDefaults::default())
    }

    /// Parse actor arguments into a reusable descriptor
    pub fn make_brush_with<S: AsRef<str>>(
        self,
        actor: &dyn Actor,
        args: &[S],
        noise: &NoiseDefaults,
    ) -> Result<Brush, BrushError> {
        let parsed = ParsedArgs::parse(args)?;
        let brush = match self {
            BrushKind::Solid => {
                parsed.no_options()?;
                let blocks = ParsedArgs::at_most(parsed.unweighted()?, 2)?;
                Brush::Solid(SolidBrush {
                    primary: blocks.first().copied(),
                    secondary: blocks.get(1).copied(),
                })
            }
            BrushKind::Random => {
                parsed.no_options()?;
                Brush::Random(RandomBrush::new(parsed.blocks)?)
            }
            BrushKind::Replace | BrushKind::ReplaceNot => {
                parsed.no_options()?;
                let replace = ReplaceBrush::from_blocks(parsed.unweighted()?)?;
                if self == BrushKind::Replace {
                    Brush::Replace(replace)
                } else {
                    Brush::ReplaceNot(replace)
                }
            }
            BrushKind::Marbled => Brush::Marbled(NoiseBrush::marbled(&parsed, noise.marbled)?),
            BrushKind::Cloudy => Brush::Cloudy(NoiseBrush::cloudy(&parsed, noise.cloudy)?),
            BrushKind::Checkered => {
                parsed.no_options()?;
                let blocks = ParsedArgs::at_most(parsed.unweighted()?, 2)?;
                let first = *blocks.first().ok_or(BrushError::NoBlocks)?;
                Brush::Checkered(CheckeredBrush {
                    first,
                    second: blocks.get(1).copied().unwrap_or(Block::Air),
                })
            }
            BrushKind::Rainbow => {
                parsed.no_options()?;
                ParsedArgs::at_most(parsed.unweighted()?, 0)?;
                Brush::Rainbow
            }
        };
        log::debug!("{} configured brush {}", actor.name(), brush.description());
        Ok(brush)
    }

    /// Build an instance for a new edit. With no arguments, a `previous`
    /// descriptor of the same kind is reused instead of parsing.
    pub fn make_instance<S: AsRef<str>>(
        self,
        actor: &dyn Actor,
        args: &[S],
        previous: Option<&Brush>,
    ) -> Result<Box<dyn BrushInstance>, BrushError> {
        if args.is_empty() {
            if let Some(previous) = previous.filter(|b| b.kind() == self) {
                return Ok(previous.instance());
            }
        }
        Ok(self.make_brush(actor, args)?.instance())
    }
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;

    #[test]
    fn test_block_arg_parse() {
        assert_eq!(BlockArg::parse("stone").unwrap(), BlockArg::new(Block::Stone));
        assert_eq!(BlockArg::parse("dirt/3").unwrap(), BlockArg::weighted(Block::Dirt, 3));
        assert_eq!(BlockArg::parse("dirt/1000").unwrap().weight(), 1000);
    }

    #[test]
    fn test_block_arg_rejections() {
        assert_eq!(BlockArg::parse("mithril"), Err(BrushError::UnknownBlock("mithril".into())));
        assert_eq!(
            BlockArg::parse("sand/0"),
            Err(BrushError::RatioOutOfRange { block: Block::Sand, ratio: 0 })
        );
        assert_eq!(
            BlockArg::parse("sand/1001"),
            Err(BrushError::RatioOutOfRange { block: Block::Sand, ratio: 1001 })
        );
        assert_eq!(BlockArg::parse("sand/x"), Err(BrushError::MalformedArgument("sand/x".into())));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!(BrushKind::parse("normal"), Ok(BrushKind::Solid));
        assert_eq!(BrushKind::parse("RN"), Ok(BrushKind::ReplaceNot));
        assert_eq!(BrushKind::parse("Cloudy"), Ok(BrushKind::Cloudy));
        assert!(matches!(BrushKind::parse("spray"), Err(BrushError::UnknownBrush(_))));
    }

    #[test]
    fn test_make_solid() {
        let actor = Session::new("a");
        let brush = BrushKind::Solid.make_brush(&actor, &["stone", "air"]).unwrap();
        assert_eq!(
            brush,
            Brush::Solid(SolidBrush { primary: Some(Block::Stone), secondary: Some(Block::Air) })
        );
        assert_eq!(brush.kind(), BrushKind::Solid);
    }

    #[test]
    fn test_solid_rejects_ratios_and_extra_blocks() {
        let actor = Session::new("a");
        assert!(matches!(
            BrushKind::Solid.make_brush(&actor, &["stone/2"]),
            Err(BrushError::MalformedArgument(_))
        ));
        assert_eq!(
            BrushKind::Solid.make_brush(&actor, &["stone", "dirt", "sand"]),
            Err(BrushError::TooManyBlocks { max: 2, got: 3 })
        );
    }

    #[test]
    fn test_too_many_blocks() {
        let actor = Session::new("a");
        let args: Vec<String> = (0..65).map(|_| "stone".to_string()).collect();
        assert_eq!(
            BrushKind::Random.make_brush(&actor, &args[..]),
            Err(BrushError::TooManyBlocks { max: MAX_BRUSH_BLOCKS, got: 65 })
        );
    }

    #[test]
    fn test_options_rejected_on_plain_brushes() {
        let actor = Session::new("a");
        assert!(matches!(
            BrushKind::Random.make_brush(&actor, &["stone", "seed=4"]),
            Err(BrushError::MalformedArgument(_))
        ));
    }

    #[test]
    fn test_rainbow_takes_no_blocks() {
        let actor = Session::new("a");
        let none: [&str; 0] = [];
        assert_eq!(BrushKind::Rainbow.make_brush(&actor, &none), Ok(Brush::Rainbow));
        assert!(BrushKind::Rainbow.make_brush(&actor, &["red"]).is_err());
    }

    #[test]
    fn test_make_instance_reuses_previous() {
        let actor = Session::new("a");
        let previous = BrushKind::Random.make_brush(&actor, &["stone/2", "dirt"]).unwrap();
        let none: [&str; 0] = [];

        let instance = BrushKind::Random.make_instance(&actor, &none, Some(&previous)).unwrap();
        assert_eq!(instance.description(), previous.description());

        // A previous brush of another kind is not reused
        let result = BrushKind::Replace.make_instance(&actor, &none, Some(&previous));
        assert!(matches!(result, Err(BrushError::MissingTarget)));
    }

    #[test]
    fn test_make_instance_new_args_win() {
        let actor = Session::new("a");
        let previous = Brush::solid(Block::Stone);
        let instance = BrushKind::Solid.make_instance(&actor, &["gold"], Some(&previous)).unwrap();
        assert_eq!(instance.description(), "Normal(Gold)");
    }

    #[test]
    fn test_descriptor_serde() {
        let actor = Session::new("a");
        let brush = BrushKind::Cloudy.make_brush(&actor, &["stone/2", "water", "seed=12"]).unwrap();
        let json = serde_json::to_string(&brush).unwrap();
        let back: Brush = serde_json::from_str(&json).unwrap();
        assert_eq!(back, brush);
    }
}
