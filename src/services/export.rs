//! Visit report export

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::visit::VisitDetails,
};

const HEADERS: [&str; 7] = [
    "Visitor",
    "Company",
    "Employee",
    "Department",
    "Purpose",
    "Status",
    "Date",
];

/// Render visits as CSV, one row per visit in the given order
pub fn visits_csv(visits: &[VisitDetails]) -> AppResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS).map_err(csv_error)?;

    for details in visits {
        let date = details.visit.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
        writer
            .write_record([
                details.visitor.name.as_str(),
                details.visitor.company.as_deref().unwrap_or("N/A"),
                details.employee.name.as_str(),
                details.department.name.as_str(),
                details.visit.purpose.as_str(),
                details.visit.status.as_str(),
                date.as_str(),
            ])
            .map_err(csv_error)?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to finish CSV export: {}", e)))
}

/// Download name for an export generated at `now`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("visitor_data_{}.csv", now.format("%Y-%m-%d"))
}

fn csv_error(e: csv::Error) -> AppError {
    AppError::Internal(format!("Failed to write CSV export: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lifecycle::transition::tests::pending_visit,
        models::{Department, Employee, Visitor, VisitorType},
    };
    use chrono::TimeZone;

    fn details(company: Option<&str>, purpose: &str) -> VisitDetails {
        let created = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
        let mut visit = pending_visit(created);
        visit.purpose = purpose.into();
        VisitDetails {
            visitor: Visitor {
                id: visit.visitor_id,
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
                phone: "+15550001111".into(),
                company: company.map(str::to_string),
                visitor_type: VisitorType::External,
                created_at: created,
            },
            employee: Employee {
                id: visit.employee_id,
                name: "Emily Davis".into(),
                email: "emily.davis@hr.company.com".into(),
                phone: None,
                department_id: "hr".into(),
            },
            department: Department {
                id: "hr".into(),
                name: "Human Resources".into(),
            },
            visit,
            is_overstayed: false,
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let csv = visits_csv(&[details(None, "Job interview")]).unwrap();
        let text = String::from_utf8(csv).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Visitor,Company,Employee,Department,Purpose,Status,Date");
        assert_eq!(
            lines[1],
            "Jane Doe,N/A,Emily Davis,Human Resources,Job interview,PENDING,2025-03-14 09:30:00 UTC"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn quotes_fields_with_separators() {
        let csv = visits_csv(&[details(Some("Acme, Inc."), "Review \"Q1\" plan")]).unwrap();
        let text = String::from_utf8(csv).unwrap();

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[1], "Acme, Inc.");
        assert_eq!(&record[4], "Review \"Q1\" plan");
    }

    #[test]
    fn filename_carries_the_date() {
        let now = Utc.with_ymd_and_hms(2025, 3, 14, 23, 59, 0).unwrap();
        assert_eq!(export_filename(now), "visitor_data_2025-03-14.csv");
    }
}
