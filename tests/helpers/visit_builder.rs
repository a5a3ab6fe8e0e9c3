// ==========================================
// 测试数据构建器 - 就诊记录
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use ed_visit_analytics::domain::types::{AgeBand, Referral, Sex};
use ed_visit_analytics::domain::{VisitRecord, VisitTimestamp};

/// 解析 "YYYY-MM-DD HH:MM"
pub fn at(value: &str) -> VisitTimestamp {
    VisitTimestamp::new(
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M").expect("测试时间格式错误"),
    )
}

// ==========================================
// VisitRecord 构建器
// ==========================================

pub struct VisitBuilder {
    record: VisitRecord,
}

impl VisitBuilder {
    /// 到达时间 "YYYY-MM-DD HH:MM"
    pub fn arriving(value: &str) -> Self {
        Self {
            record: VisitRecord::new(Some(at(value))),
        }
    }

    /// 只有离院时间的记录
    pub fn discharge_only(value: &str) -> Self {
        let mut record = VisitRecord::new(None);
        record.discharge = Some(at(value));
        Self { record }
    }

    /// 没有任何时间戳的记录
    pub fn untimed() -> Self {
        Self {
            record: VisitRecord::new(None),
        }
    }

    pub fn arriving_date_only(date: NaiveDate) -> Self {
        Self {
            record: VisitRecord::new(Some(VisitTimestamp::date_only(date))),
        }
    }

    pub fn discharged(mut self, value: &str) -> Self {
        self.record.discharge = Some(at(value));
        self
    }

    pub fn hospitalized(mut self) -> Self {
        self.record.hospitalized = true;
        self
    }

    pub fn ems(mut self) -> Self {
        self.record.ems = true;
        self
    }

    pub fn referral(mut self, referral: Referral) -> Self {
        self.record.referral = referral;
        self
    }

    /// 持转诊单 + 片区
    pub fn referred_from(mut self, area: &str) -> Self {
        self.record.referral = Referral::WithReferral;
        self.record.primary_care_area = Some(area.to_string());
        self
    }

    pub fn diagnosis(mut self, code: &str) -> Self {
        self.record.diagnosis_code = Some(code.to_string());
        self
    }

    pub fn department(mut self, name: &str) -> Self {
        self.record.department = Some(name.to_string());
        self
    }

    pub fn age_band(mut self, band: AgeBand) -> Self {
        self.record.age_band = band;
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.record.sex = sex;
        self
    }

    pub fn build(self) -> VisitRecord {
        self.record
    }
}

// ==========================================
// 固定场景
// ==========================================

/// 2024-02-01..2024-02-10 共 17 次就诊，其中 6 次住院
pub fn seventeen_visits() -> Vec<VisitRecord> {
    // 每天就诊次数: 1..=10 日分别为 2,2,2,2,2,2,2,1,1,1
    let per_day = [2, 2, 2, 2, 2, 2, 2, 1, 1, 1];
    let mut records = Vec::new();
    let mut n = 0;
    for (i, count) in per_day.iter().enumerate() {
        for k in 0..*count {
            let arrival = format!("2024-02-{:02} {:02}:30", i + 1, 9 + k * 12);
            let discharge = format!("2024-02-{:02} {:02}:45", i + 1, 10 + k * 12);
            let mut builder = VisitBuilder::arriving(&arrival).discharged(&discharge);
            if n % 3 == 0 {
                builder = builder.hospitalized();
            }
            records.push(builder.build());
            n += 1;
        }
    }
    records
}

/// 两个片区的转诊就诊（跨 2023/2024）
///
/// - "Vilniaus rajono PSPC": 8 次（2023 年 3 次、2024 年 5 次），住院 4 次
/// - "Small Clinic": 2 次（2024 年）
pub fn referral_fixture() -> Vec<VisitRecord> {
    let mut records = Vec::new();
    for (i, day) in ["2023-03-01", "2023-06-01", "2023-09-01"].iter().enumerate() {
        let mut b = VisitBuilder::arriving(&format!("{} 10:00", day))
            .referred_from("Vilniaus rajono PSPC")
            .diagnosis("J18.9")
            .age_band(AgeBand::Age65To79);
        if i == 0 {
            b = b.hospitalized();
        }
        records.push(b.build());
    }
    for (i, day) in ["2024-01-10", "2024-02-10", "2024-03-10", "2024-04-10", "2024-05-10"]
        .iter()
        .enumerate()
    {
        let mut b = VisitBuilder::arriving(&format!("{} 11:00", day))
            .referred_from("Vilniaus rajono PSPC")
            .diagnosis("I21.4")
            .age_band(AgeBand::Age80Plus);
        if i < 3 {
            b = b.hospitalized();
        }
        records.push(b.build());
    }
    for day in ["2024-06-01", "2024-07-01"] {
        records.push(
            VisitBuilder::arriving(&format!("{} 12:00", day))
                .referred_from("Small Clinic")
                .diagnosis("K35")
                .build(),
        );
    }
    records
}
