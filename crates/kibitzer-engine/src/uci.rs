use kibitzer_core::EngineEvaluation;

/// One line of engine output, classified by prefix.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineLine {
    Info(UciInfo),
    BestMove(BestMove),
    /// Identification, option acknowledgements and anything else.
    Other,
}

impl EngineLine {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Some(bm) = BestMove::parse(line) {
            return EngineLine::BestMove(bm);
        }
        match UciInfo::parse(line) {
            Some(info) => EngineLine::Info(info),
            None => EngineLine::Other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UciInfo {
    pub depth: Option<u8>,
    pub seldepth: Option<u8>,
    pub multipv: Option<u8>,
    pub score: Option<EngineEvaluation>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    pub time: Option<u64>,
    pub pv: Vec<String>,
    pub currmove: Option<String>,
    pub hashfull: Option<u16>,
}

impl UciInfo {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("info") {
            return None;
        }
        let mut info = Self::default();
        while let Some(token) = parts.next() {
            match token {
                "depth" => info.depth = parts.next().and_then(|s| s.parse().ok()),
                "seldepth" => info.seldepth = parts.next().and_then(|s| s.parse().ok()),
                "multipv" => info.multipv = parts.next().and_then(|s| s.parse().ok()),
                "score" => {
                    info.score = match parts.next() {
                        Some("cp") => parts
                            .next()
                            .and_then(|s| s.parse().ok())
                            .map(EngineEvaluation::centipawns),
                        Some("mate") => parts
                            .next()
                            .and_then(|s| s.parse().ok())
                            .map(EngineEvaluation::mate),
                        _ => None,
                    }
                }
                "nodes" => info.nodes = parts.next().and_then(|s| s.parse().ok()),
                "nps" => info.nps = parts.next().and_then(|s| s.parse().ok()),
                "time" => info.time = parts.next().and_then(|s| s.parse().ok()),
                "hashfull" => info.hashfull = parts.next().and_then(|s| s.parse().ok()),
                "currmove" => info.currmove = parts.next().map(|s| s.to_string()),
                "pv" => {
                    for m in parts {
                        info.pv.push(m.to_string());
                    }
                    break;
                }
                // free text until end of line
                "string" => break,
                _ => {}
            }
        }
        Some(info)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BestMove {
    /// `None` when the engine answers `bestmove (none)`.
    pub mv: Option<String>,
    pub ponder: Option<String>,
}

impl BestMove {
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        if parts.next() != Some("bestmove") {
            return None;
        }
        let mv = parts
            .next()
            .filter(|m| *m != "(none)")
            .map(|m| m.to_string());
        let mut ponder = None;
        while let Some(token) = parts.next() {
            if token == "ponder" {
                ponder = parts.next().map(|s| s.to_string());
            }
        }
        Some(Self { mv, ponder })
    }
}
