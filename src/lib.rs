//! Shelfrolls library: the 3D polyhedral dice engine behind the reading-queue app.

pub mod dice3d;
