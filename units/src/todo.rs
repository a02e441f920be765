/// Units which are simply type aliases for `f32` rather than having an
/// implementation as a `uom` `Quantity`.
///
/// These are used in the inner loops of the projector and the solvers, where
/// the values have already been stripped of their units, but we still want some
/// clues in the source as to what they represent.

pub type Lengthf32    = f32;
pub type Weightf32    = f32; // intersection length of a ray with a voxel
pub type Ratiof32     = f32;
pub type Intensityf32 = f32; // TODO uom attenuation coefficient
