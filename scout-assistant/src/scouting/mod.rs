// Scouting engine: outlier detection, zone mapping, write-up assembly.

pub mod format;
pub mod matchups;
pub mod outliers;
pub mod wheel;
pub mod writeup;
pub mod zones;
