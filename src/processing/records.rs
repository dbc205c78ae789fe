//! Structured job and resume records produced by the parsers

use crate::error::{RelevanceError, Result};
use crate::processing::normalizer::SkillToken;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub role: String,
    pub company: String,
    pub duration: String,
    /// Years derived from `duration`.
    pub years: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: Option<String>,
    pub year: Option<String>,
    pub field: Option<String>,
}

impl Education {
    /// Degree and field as one lower-cased string for keyword checks.
    pub fn qualification_text(&self) -> String {
        match &self.field {
            Some(field) => format!("{} {}", self.degree, field).to_lowercase(),
            None => self.degree.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<SkillToken>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: Option<String>,
    pub role_title: String,
    pub company: String,
    pub location: Option<String>,
    pub must_have_skills: BTreeSet<SkillToken>,
    pub good_to_have_skills: BTreeSet<SkillToken>,
    /// Dictionary technical skills in order of appearance.
    pub technical_skills: Vec<SkillToken>,
    pub soft_skills: Vec<SkillToken>,
    pub qualifications: Vec<String>,
    pub experience_required: String,
    pub responsibilities: Vec<String>,
    pub domain_keywords: Vec<String>,
    pub salary_range: Option<String>,
    pub description: String,
}

impl JobRecord {
    pub fn builder(role_title: impl Into<String>) -> JobRecordBuilder {
        JobRecordBuilder::new(role_title)
    }

    pub fn validate(&self) -> Result<()> {
        if self.role_title.trim().is_empty() {
            return Err(RelevanceError::Validation(
                "job record requires a role title".to_string(),
            ));
        }
        if let Some(overlap) = self.must_have_skills.intersection(&self.good_to_have_skills).next() {
            return Err(RelevanceError::Validation(format!(
                "skill '{}' is listed as both must-have and good-to-have",
                overlap
            )));
        }
        Ok(())
    }

    pub fn has_skill_requirements(&self) -> bool {
        !self.must_have_skills.is_empty() || !self.good_to_have_skills.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct JobRecordBuilder {
    record: JobRecord,
}

impl JobRecordBuilder {
    pub fn new(role_title: impl Into<String>) -> Self {
        Self {
            record: JobRecord {
                id: None,
                role_title: role_title.into(),
                company: String::new(),
                location: None,
                must_have_skills: BTreeSet::new(),
                good_to_have_skills: BTreeSet::new(),
                technical_skills: Vec::new(),
                soft_skills: Vec::new(),
                qualifications: Vec::new(),
                experience_required: "Not specified".to_string(),
                responsibilities: Vec::new(),
                domain_keywords: Vec::new(),
                salary_range: None,
                description: String::new(),
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.record.id = Some(id.into());
        self
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.record.company = company.into();
        self
    }

    pub fn location(mut self, location: Option<String>) -> Self {
        self.record.location = location;
        self
    }

    pub fn must_have<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillToken>,
    {
        self.record.must_have_skills.extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn good_to_have<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillToken>,
    {
        self.record.good_to_have_skills.extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn technical_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillToken>,
    {
        for skill in skills.into_iter().map(Into::into) {
            if !self.record.technical_skills.contains(&skill) {
                self.record.technical_skills.push(skill);
            }
        }
        self
    }

    pub fn soft_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillToken>,
    {
        for skill in skills.into_iter().map(Into::into) {
            if !self.record.soft_skills.contains(&skill) {
                self.record.soft_skills.push(skill);
            }
        }
        self
    }

    pub fn qualifications(mut self, qualifications: Vec<String>) -> Self {
        self.record.qualifications = qualifications;
        self
    }

    pub fn experience_required(mut self, requirement: impl Into<String>) -> Self {
        self.record.experience_required = requirement.into();
        self
    }

    pub fn responsibilities(mut self, responsibilities: Vec<String>) -> Self {
        self.record.responsibilities = responsibilities;
        self
    }

    pub fn domain_keywords(mut self, keywords: Vec<String>) -> Self {
        self.record.domain_keywords = keywords;
        self
    }

    pub fn salary_range(mut self, salary: Option<String>) -> Self {
        self.record.salary_range = salary;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.record.description = description.into();
        self
    }

    /// Must-have wins when a skill is listed in both buckets.
    pub fn build(mut self) -> Result<JobRecord> {
        let overlap: Vec<SkillToken> = self
            .record
            .must_have_skills
            .intersection(&self.record.good_to_have_skills)
            .cloned()
            .collect();
        for skill in overlap {
            debug!("Dropping '{}' from good-to-have; already must-have", skill);
            self.record.good_to_have_skills.remove(&skill);
        }
        self.record.must_have_skills.retain(|s| !s.is_empty());
        self.record.good_to_have_skills.retain(|s| !s.is_empty());

        self.record.validate()?;
        Ok(self.record)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub id: Option<String>,
    pub candidate_name: String,
    pub contact: ContactInfo,
    pub technical_skills: BTreeSet<SkillToken>,
    pub soft_skills: BTreeSet<SkillToken>,
    /// Skills listed by the candidate that the dictionary does not know.
    pub additional_skills: BTreeSet<SkillToken>,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub projects: Vec<Project>,
    pub certifications: Vec<String>,
    pub achievements: Vec<String>,
    pub github_links: Vec<String>,
    pub linkedin_profile: Option<String>,
    pub total_experience_years: f32,
    pub quality_score: f32,
    pub text: String,
}

impl ResumeRecord {
    pub fn builder(candidate_name: impl Into<String>) -> ResumeRecordBuilder {
        ResumeRecordBuilder::new(candidate_name)
    }

    /// Union of every skill bucket; the set hard matching compares against.
    pub fn all_skills(&self) -> BTreeSet<SkillToken> {
        self.technical_skills
            .iter()
            .chain(self.soft_skills.iter())
            .chain(self.additional_skills.iter())
            .cloned()
            .collect()
    }

    pub fn has_profile_link(&self) -> bool {
        !self.github_links.is_empty() || self.linkedin_profile.is_some()
    }

    pub fn validate(&self) -> Result<()> {
        if self.candidate_name.trim().is_empty() {
            return Err(RelevanceError::Validation(
                "resume record requires a candidate name".to_string(),
            ));
        }
        if !self.total_experience_years.is_finite() || self.total_experience_years < 0.0 {
            return Err(RelevanceError::Validation(format!(
                "total experience must be a non-negative number, got {}",
                self.total_experience_years
            )));
        }
        if !(0.0..=10.0).contains(&self.quality_score) {
            return Err(RelevanceError::Validation(format!(
                "quality score must be within 0-10, got {}",
                self.quality_score
            )));
        }
        if let Some(bad) = self
            .work_experience
            .iter()
            .find(|exp| !exp.years.is_finite() || exp.years < 0.0)
        {
            return Err(RelevanceError::Validation(format!(
                "work experience '{}' has invalid years {}",
                bad.role, bad.years
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ResumeRecordBuilder {
    record: ResumeRecord,
}

impl ResumeRecordBuilder {
    pub fn new(candidate_name: impl Into<String>) -> Self {
        Self {
            record: ResumeRecord {
                id: None,
                candidate_name: candidate_name.into(),
                contact: ContactInfo::default(),
                technical_skills: BTreeSet::new(),
                soft_skills: BTreeSet::new(),
                additional_skills: BTreeSet::new(),
                work_experience: Vec::new(),
                education: Vec::new(),
                projects: Vec::new(),
                certifications: Vec::new(),
                achievements: Vec::new(),
                github_links: Vec::new(),
                linkedin_profile: None,
                total_experience_years: 0.0,
                quality_score: 0.0,
                text: String::new(),
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.record.id = Some(id.into());
        self
    }

    pub fn contact(mut self, contact: ContactInfo) -> Self {
        self.record.contact = contact;
        self
    }

    pub fn technical_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillToken>,
    {
        self.record.technical_skills.extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn soft_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillToken>,
    {
        self.record.soft_skills.extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn additional_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SkillToken>,
    {
        self.record.additional_skills.extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn work_experience(mut self, experience: Vec<WorkExperience>) -> Self {
        self.record.work_experience = experience;
        self
    }

    pub fn education(mut self, education: Vec<Education>) -> Self {
        self.record.education = education;
        self
    }

    pub fn projects(mut self, projects: Vec<Project>) -> Self {
        self.record.projects = projects;
        self
    }

    pub fn certifications(mut self, certifications: Vec<String>) -> Self {
        self.record.certifications = certifications;
        self
    }

    pub fn achievements(mut self, achievements: Vec<String>) -> Self {
        self.record.achievements = achievements;
        self
    }

    pub fn github_links(mut self, links: Vec<String>) -> Self {
        self.record.github_links = links;
        self
    }

    pub fn linkedin_profile(mut self, profile: Option<String>) -> Self {
        self.record.linkedin_profile = profile;
        self
    }

    pub fn total_experience_years(mut self, years: f32) -> Self {
        self.record.total_experience_years = years;
        self
    }

    pub fn quality_score(mut self, score: f32) -> Self {
        self.record.quality_score = score;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.record.text = text.into();
        self
    }

    pub fn build(mut self) -> Result<ResumeRecord> {
        self.record.technical_skills.retain(|s| !s.is_empty());
        self.record.soft_skills.retain(|s| !s.is_empty());
        self.record.additional_skills.retain(|s| !s.is_empty());
        self.record.validate()?;
        Ok(self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_builder_normalizes_and_dedups() {
        let job = JobRecord::builder("Backend Engineer")
            .must_have(["Python", "Django", "python"])
            .good_to_have(["ReactJS", "Django"])
            .build()
            .unwrap();

        assert_eq!(job.must_have_skills.len(), 2);
        assert!(job.good_to_have_skills.contains(&SkillToken::from("react")));
        assert!(!job.good_to_have_skills.contains(&SkillToken::from("django")));
    }

    #[test]
    fn test_job_requires_role_title() {
        let result = JobRecord::builder("  ").build();
        assert!(matches!(result, Err(RelevanceError::Validation(_))));
    }

    #[test]
    fn test_deserialized_job_overlap_rejected() {
        let mut job = JobRecord::builder("Engineer").must_have(["rust"]).build().unwrap();
        job.good_to_have_skills.insert(SkillToken::from("rust"));
        assert!(job.validate().is_err());
    }

    #[test]
    fn test_resume_requires_name() {
        let result = ResumeRecord::builder("").build();
        assert!(matches!(result, Err(RelevanceError::Validation(_))));
    }

    #[test]
    fn test_resume_rejects_out_of_range_scores() {
        assert!(ResumeRecord::builder("Jane").quality_score(11.0).build().is_err());
        assert!(ResumeRecord::builder("Jane")
            .total_experience_years(f32::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn test_all_skills_union() {
        let resume = ResumeRecord::builder("Jane")
            .technical_skills(["Rust"])
            .soft_skills(["Leadership"])
            .additional_skills(["Zig"])
            .build()
            .unwrap();
        let all = resume.all_skills();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&SkillToken::from("zig")));
    }

    #[test]
    fn test_qualification_text() {
        let education = Education {
            degree: "B.Tech".to_string(),
            institution: None,
            year: None,
            field: Some("Computer Science".to_string()),
        };
        assert_eq!(education.qualification_text(), "b.tech computer science");
    }
}
