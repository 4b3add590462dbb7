pub mod particles;
pub mod tween;
pub mod ui;

#[cfg(test)]
mod test_support;
