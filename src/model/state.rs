/// Marker type for a model that is **not yet trained**.
///
/// Training methods (like `Trainer::fit`) take an `Unfitted` model; `predict`
/// is not available until the model has been converted to `Fitted`.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// Marker type for a **trained** model.
///
/// A `Fitted` model carries only inference parameters: no optimizer state,
/// loss function or training hyperparameters.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
