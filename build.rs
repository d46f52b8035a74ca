//! Retrieves information about the version of the engine from Git and the build
//! environment. The binary prints it on start-up so that a transcript of a game
//! can be traced back to the exact rules engine that produced it.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
