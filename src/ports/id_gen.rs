//! ID generator port for producing unique identifiers.

/// Generates unique identifiers for file records and folder nodes.
///
/// Abstracting ID generation keeps tree construction deterministic under
/// test and during cassette playback.
///
/// The method is infallible, so an implementation that cannot produce an
/// identifier has to panic. The replaying adapter does exactly that when a
/// session asks for more IDs than were recorded: a cassette is only valid
/// for replaying the same upload it was recorded from.
pub trait IdGenerator: Send + Sync {
    /// Generates a new identifier, never returned before by this generator.
    fn generate_id(&self) -> String;
}
