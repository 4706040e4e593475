use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Invalid grid coordinate: {0:?}")]
    InvalidCoordinate(String),

    #[error("Coordinate {coord} outside arena ({columns} columns x {rows} rows)")]
    OutOfBounds {
        coord: String,
        columns: u8,
        rows: u8,
    },

    #[error("Unknown compass direction: {0:?}")]
    UnknownCompass(String),

    #[error("Unknown actuator command: {0:?}")]
    UnknownActuator(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Driver stopped: {0}")]
    DriverStopped(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArenaError>;
