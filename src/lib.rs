//! Crown & Levy: a turn-based conquest engine for the kingdoms of early medieval Britain

pub mod game;
