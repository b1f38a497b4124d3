/// A marker type indicating that a model is **not yet trained**.
///
/// Training methods (`forward`, `backward`, parameter updates) are only
/// available on `Model<Unfitted>`; `predict` is not.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A `Fitted` model contains only inference parameters and can be
/// serialized or used for prediction.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
