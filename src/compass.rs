/// Translates numeric courses to 8/16-point compass directions. (N, NE, E, etc.)
/// Represents a 16-point compass rose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

const ROSE: [Direction; 16] = [
    Direction::N,
    Direction::NNE,
    Direction::NE,
    Direction::ENE,
    Direction::E,
    Direction::ESE,
    Direction::SE,
    Direction::SSE,
    Direction::S,
    Direction::SSW,
    Direction::SW,
    Direction::WSW,
    Direction::W,
    Direction::WNW,
    Direction::NW,
    Direction::NNW,
];

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl Direction {
    /// Nearest of the 16 points to `course` (any angle, wrapped to 0-360).
    pub fn from_course(course: f64) -> Self {
        // each direction covers 22.5 degrees (360 / 16), centred on its point
        let sector = ((crate::geodesy::normalize_course(course) + 11.25) / 22.5) as usize;
        ROSE[sector % 16]
    }

    /// Nearest of the 8 principal points (N, NE, E, ...).
    pub fn from_course_8point(course: f64) -> Self {
        let sector = ((crate::geodesy::normalize_course(course) + 22.5) / 45.0) as usize;
        ROSE[(sector % 8) * 2]
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::NNE => "NNE",
            Direction::NE => "NE",
            Direction::ENE => "ENE",
            Direction::E => "E",
            Direction::ESE => "ESE",
            Direction::SE => "SE",
            Direction::SSE => "SSE",
            Direction::S => "S",
            Direction::SSW => "SSW",
            Direction::SW => "SW",
            Direction::WSW => "WSW",
            Direction::W => "W",
            Direction::WNW => "WNW",
            Direction::NW => "NW",
            Direction::NNW => "NNW",
        }
    }
}
