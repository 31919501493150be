use super::event::{Event, Grade, Status};
use chrono::{Datelike, NaiveDate};

/// Built-in African-region snapshot: (country, disease, grade, status,
/// event type, lat, lon, event count, location, description, cases, deaths,
/// report date)
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f64,
    f64,
    u64,
    &'static str,
    &'static str,
    u64,
    u64,
    (i32, u32, u32),
);

const ROWS: [SampleRow; 20] = [
    ("Malawi", "Cholera", "Grade 2", "Ongoing", "Outbreak", -13.9626, 33.7741, 26, "Chitipa/Lilongwe/Balaka",
     "Cholera outbreak in Malawi. 3 confirmed cases, 23 suspected cases. Cross-border cases linked to Mozambique. OCV campaign planned. IMS on standby.",
     26, 0, (2025, 12, 19)),
    ("Mozambique", "Cholera", "Grade 3", "Ongoing", "Outbreak", -18.665695, 35.529562, 145, "Lizinje area",
     "Ongoing cholera outbreak in Mozambique with cross-border transmission to Malawi. Cases reported in Lizinje area near border.",
     145, 3, (2025, 12, 18)),
    ("Nigeria", "Cholera", "Grade 3", "Ongoing", "Outbreak", 6.5244, 3.3792, 2341, "Lagos",
     "Severe cholera outbreak in Lagos and surrounding states. Multi-state outbreak with significant case load.",
     2341, 67, (2025, 12, 15)),
    ("Democratic Republic of the Congo", "Mpox", "Grade 3", "Ongoing", "Outbreak", -4.3217, 15.3125, 8924, "Multiple provinces",
     "Ongoing mpox outbreak in DRC with sustained community transmission. Multiple provinces affected.",
     8924, 156, (2025, 12, 20)),
    ("Uganda", "Mpox", "Grade 2", "Ongoing", "Outbreak", 0.3476, 32.5825, 234, "Kampala",
     "Mpox cases reported in Kampala and border districts. Contact tracing ongoing.",
     234, 8, (2025, 12, 17)),
    ("South Africa", "Measles", "Grade 2", "Ongoing", "Outbreak", -30.5595, 22.9375, 456, "Western Cape",
     "Measles outbreak in Western Cape province. Vaccination campaign intensified.",
     456, 5, (2025, 12, 14)),
    ("Ethiopia", "Cholera", "Grade 2", "Ongoing", "Outbreak", 9.145, 40.4897, 567, "Somali region",
     "Cholera outbreak in Somali region. Humanitarian crisis contributing factor.",
     567, 12, (2025, 12, 16)),
    ("Kenya", "Malaria", "Grade 1", "New", "Outbreak", -1.286389, 36.817223, 1234, "Coastal regions",
     "Increased malaria transmission in coastal regions. Seasonal pattern observed.",
     1234, 23, (2025, 12, 19)),
    ("Ghana", "Yellow Fever", "Grade 2", "Ongoing", "Outbreak", 5.6037, -0.187, 89, "Northern regions",
     "Yellow fever outbreak in northern regions. Vaccination campaign deployed.",
     89, 18, (2025, 12, 13)),
    ("Somalia", "Cholera", "Grade 3", "Ongoing", "Humanitarian Crisis", 2.0469, 45.3182, 3456, "Multiple regions",
     "Severe cholera outbreak exacerbated by humanitarian crisis and flooding. Multiple regions affected.",
     3456, 89, (2025, 12, 18)),
    ("Zimbabwe", "Typhoid", "Grade 2", "Ongoing", "Outbreak", -17.8252, 31.0335, 234, "Harare",
     "Typhoid outbreak in Harare and surrounding areas. Water contamination suspected.",
     234, 6, (2025, 12, 12)),
    ("Tanzania", "Cholera", "Grade 2", "Ongoing", "Outbreak", -6.7924, 39.2083, 345, "Dar es Salaam",
     "Cholera cases reported in Dar es Salaam and coastal regions.",
     345, 9, (2025, 12, 15)),
    ("Cameroon", "Cholera", "Grade 2", "Ongoing", "Outbreak", 3.848, 11.5021, 456, "Far North",
     "Cholera outbreak in Far North region. Cross-border surveillance enhanced.",
     456, 14, (2025, 12, 17)),
    ("Zambia", "Cholera", "Grade 2", "Ongoing", "Outbreak", -15.4167, 28.2833, 678, "Lusaka/Copperbelt",
     "Cholera outbreak in Lusaka and Copperbelt provinces.",
     678, 17, (2025, 12, 14)),
    ("Niger", "Meningitis", "Grade 2", "New", "Outbreak", 13.5127, 2.1126, 123, "Meningitis belt",
     "Meningitis cases increasing in meningitis belt region. Seasonal pattern.",
     123, 21, (2025, 12, 19)),
    ("Rwanda", "Marburg Virus", "Grade 3", "Ongoing", "Outbreak", -1.9403, 29.8739, 12, "Multiple districts",
     "Marburg virus outbreak. Contact tracing and isolation measures in place.",
     12, 7, (2025, 12, 11)),
    ("Burundi", "Malaria", "Grade 1", "Ongoing", "Outbreak", -3.3731, 29.9189, 2345, "Multiple provinces",
     "Seasonal malaria increase in multiple provinces.",
     2345, 34, (2025, 12, 16)),
    ("Angola", "Yellow Fever", "Grade 2", "Ongoing", "Outbreak", -8.8383, 13.2344, 67, "Luanda",
     "Yellow fever cases in Luanda province. Vaccination campaign ongoing.",
     67, 12, (2025, 12, 13)),
    ("Senegal", "Dengue", "Grade 1", "New", "Outbreak", 14.6928, -17.4467, 234, "Dakar",
     "Dengue fever cases reported in Dakar. Vector control measures deployed.",
     234, 2, (2025, 12, 18)),
    ("Mali", "Measles", "Grade 2", "Ongoing", "Outbreak", 12.6392, -8.0029, 456, "Bamako",
     "Measles outbreak in Bamako and surrounding regions. Vaccination coverage assessment ongoing.",
     456, 11, (2025, 12, 15)),
];

/// The built-in table as events
pub fn sample_events() -> Vec<Event> {
    ROWS.iter()
        .map(
            |&(country, disease, grade, status, event_type, lat, lon, count, location, description, cases, deaths, (y, m, d))| {
                let report_date = NaiveDate::from_ymd_opt(y, m, d);
                Event {
                    country: country.to_string(),
                    disease: disease.to_string(),
                    grade: Grade::parse(grade),
                    status: Status::parse(status),
                    event_type: event_type.to_string(),
                    lat: Some(lat),
                    lon: Some(lon),
                    event_count: Some(count),
                    location: location.to_string(),
                    description: description.to_string(),
                    cases: Some(cases),
                    deaths: Some(deaths),
                    year: report_date.map(|date| date.year()),
                    report_date,
                }
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{is_valid_latitude, is_valid_longitude};

    #[test]
    fn test_sample_rows_are_well_formed() {
        let events = sample_events();
        assert_eq!(events.len(), 20);
        for e in &events {
            assert!(is_valid_latitude(e.lat.unwrap()), "{}", e.country);
            assert!(is_valid_longitude(e.lon.unwrap()), "{}", e.country);
            assert!(e.deaths <= e.cases, "{}", e.country);
            assert!(e.report_date.is_some());
            assert_eq!(e.year, Some(2025));
            assert_ne!(e.grade, Grade::Ungraded);
        }
    }

    #[test]
    fn test_sample_grade_mix() {
        let events = sample_events();
        let g3 = events.iter().filter(|e| e.grade == Grade::Grade3).count();
        let new = events.iter().filter(|e| e.status == Status::New).count();
        assert_eq!(g3, 5);
        assert_eq!(new, 3);
    }
}
