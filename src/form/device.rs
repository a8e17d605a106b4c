//! The device registration form and QR scan-link prefill.

use url::Url;

use crate::error::FormError;
use crate::form::Form;

/// Text controls of the device registration form, in page order.
pub const DEVICE_FIELDS: [&str; 10] = [
    "serial",
    "build_date",
    "mfg_location",
    "lot_number",
    "technician",
    "school",
    "software_version",
    "condition",
    "latitude",
    "longitude",
];

/// Query parameters a device label may carry, and the field each fills.
const SCAN_PARAMS: [(&str, &str); 4] = [
    ("serial", "serial"),
    ("date", "build_date"),
    ("location", "mfg_location"),
    ("lot", "lot_number"),
];

/// Build the device registration form with every field empty.
pub fn device_form(action: &str, method: &str) -> Result<Form, FormError> {
    let mut form = Form::new(action, method)?;
    for name in DEVICE_FIELDS {
        form.add_text(name);
    }
    Ok(form)
}

/// Copy device identity from a scanned label URL into `form`.
///
/// Values become the fields' initial values, so they survive a reset after
/// a successful submission. Parameters that are absent leave their field
/// alone; unrecognised parameters are ignored. Values are taken as they
/// appear in the link, without trimming, and a repeated parameter keeps its
/// first value. Returns how many fields were filled.
pub fn prefill_from_scan_url(form: &Form, scan_url: &str) -> Result<usize, FormError> {
    let url = Url::parse(scan_url).map_err(|e| FormError::InvalidScanUrl {
        url: scan_url.to_string(),
        reason: e.to_string(),
    })?;

    let mut seen = [false; SCAN_PARAMS.len()];
    let mut filled = 0;
    for (key, value) in url.query_pairs() {
        let Some(index) = SCAN_PARAMS.iter().position(|(param, _)| *param == key) else {
            continue;
        };
        if std::mem::replace(&mut seen[index], true) {
            continue;
        }
        if let Some(handle) = form.field(SCAN_PARAMS[index].1) {
            handle.set_default_value(value);
            filled += 1;
        }
    }

    tracing::debug!(filled, "Prefilled device form from scan link");
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_has_all_device_fields() {
        let form = device_form("http://127.0.0.1:5000/", "POST").unwrap();
        let names: Vec<&str> = form.controls().iter().map(|c| c.name()).collect();
        assert_eq!(names, DEVICE_FIELDS.to_vec());
        assert!(form.entries().entries().iter().all(|(_, v)| {
            matches!(v, crate::form::FormValue::Text(t) if t.is_empty())
        }));
    }

    #[test]
    fn prefill_maps_label_params_to_fields() {
        let form = device_form("http://127.0.0.1:5000/", "POST").unwrap();
        let filled = prefill_from_scan_url(
            &form,
            "http://127.0.0.1:5000/?serial=LM-0042&date=2024-03-01&location=Kathmandu&lot=7&model=L3",
        )
        .unwrap();

        assert_eq!(filled, 4);
        assert_eq!(form.value("serial"), "LM-0042");
        assert_eq!(form.value("build_date"), "2024-03-01");
        assert_eq!(form.value("mfg_location"), "Kathmandu");
        assert_eq!(form.value("lot_number"), "7");
    }

    #[test]
    fn prefilled_identity_survives_reset() {
        let form = device_form("http://127.0.0.1:5000/", "POST").unwrap();
        prefill_from_scan_url(&form, "http://127.0.0.1:5000/?serial=LM-0042").unwrap();
        form.set("school", "Saint Marys").unwrap();

        form.reset();

        assert_eq!(form.value("serial"), "LM-0042");
        assert_eq!(form.value("school"), "");
    }

    #[test]
    fn missing_params_leave_fields_untouched() {
        let form = device_form("http://127.0.0.1:5000/", "POST").unwrap();
        form.set("lot_number", "12").unwrap();
        let filled = prefill_from_scan_url(&form, "http://127.0.0.1:5000/?serial=A1").unwrap();
        assert_eq!(filled, 1);
        assert_eq!(form.value("lot_number"), "12");
    }

    #[test]
    fn invalid_scan_url_is_rejected() {
        let form = device_form("http://127.0.0.1:5000/", "POST").unwrap();
        assert!(matches!(
            prefill_from_scan_url(&form, "not a url"),
            Err(FormError::InvalidScanUrl { .. })
        ));
    }

    #[test]
    fn repeated_params_keep_first_value_untrimmed() {
        let form = device_form("http://127.0.0.1:5000/", "POST").unwrap();
        let filled = prefill_from_scan_url(
            &form,
            "http://127.0.0.1:5000/?serial=%20LM-0042%20&serial=LM-9999&lot=+7",
        )
        .unwrap();

        assert_eq!(filled, 2);
        assert_eq!(form.value("serial"), " LM-0042 ");
        assert_eq!(form.value("lot_number"), " 7");
    }
}
