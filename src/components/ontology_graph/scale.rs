/// Linear map from a numeric domain onto a pixel range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
	domain: (f64, f64),
	range: (f64, f64),
}

impl LinearScale {
	pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
		Self { domain, range }
	}

	/// A collapsed domain maps everything to the middle of the range.
	pub fn apply(&self, value: f64) -> f64 {
		let (d0, d1) = self.domain;
		let (r0, r1) = self.range;
		if d1 == d0 {
			return (r0 + r1) / 2.0;
		}
		r0 + (value - d0) / (d1 - d0) * (r1 - r0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn maps_endpoints_and_midpoint() {
		let scale = LinearScale::new((0.0, 4.0), (50.0, 550.0));
		assert_eq!(scale.apply(0.0), 50.0);
		assert_eq!(scale.apply(4.0), 550.0);
		assert_eq!(scale.apply(2.0), 300.0);
	}

	#[test]
	fn degenerate_domain_uses_range_midpoint() {
		let scale = LinearScale::new((0.0, 0.0), (50.0, 550.0));
		assert_eq!(scale.apply(0.0), 300.0);
	}
}
