//! Which boundary kinds a sweep should reconstruct.

use brook_core::SiteLabel;

/// Selects the site labels a call to
/// [`BoundaryEngine::apply`](crate::BoundaryEngine::apply) acts on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoundaryRequest {
    /// Solid, inlet and outlet sites.
    #[default]
    All,
    /// Solid sites only, followed by the solid velocity reset.
    SolidOnly,
    /// Inlet sites only.
    InletOnly,
    /// Outlet sites only.
    OutletOnly,
    /// Inlet and outlet sites.
    InletAndOutlet,
}

impl BoundaryRequest {
    /// `true` if sites labelled `label` are reconstructed under this request.
    pub fn applies_to(self, label: SiteLabel) -> bool {
        match label {
            SiteLabel::Fluid => false,
            SiteLabel::Solid => matches!(self, Self::All | Self::SolidOnly),
            SiteLabel::Inlet => matches!(self, Self::All | Self::InletOnly | Self::InletAndOutlet),
            SiteLabel::Outlet => {
                matches!(self, Self::All | Self::OutletOnly | Self::InletAndOutlet)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_select_labels() {
        use SiteLabel::*;
        let table = [
            (BoundaryRequest::All, [true, true, true]),
            (BoundaryRequest::SolidOnly, [true, false, false]),
            (BoundaryRequest::InletOnly, [false, true, false]),
            (BoundaryRequest::OutletOnly, [false, false, true]),
            (BoundaryRequest::InletAndOutlet, [false, true, true]),
        ];
        for (request, expected) in table {
            let got = [Solid, Inlet, Outlet].map(|l| request.applies_to(l));
            assert_eq!(got, expected, "{request:?}");
            assert!(!request.applies_to(Fluid));
        }
    }
}
