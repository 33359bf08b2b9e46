use anyhow::{Context, Result};
use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::models::{
    ClassSubject, MarkRecord, Resource, SchoolClass, Student, SyllabusEntry, SyllabusUnit,
};

/// Every collection, persisted together as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Documents {
    #[serde(default)]
    classes: Vec<SchoolClass>,
    #[serde(default)]
    students: Vec<Student>,
    #[serde(default)]
    subjects: Vec<ClassSubject>,
    #[serde(default)]
    marks: Vec<MarkRecord>,
    #[serde(default)]
    syllabus: Vec<SyllabusEntry>,
    #[serde(default)]
    resources: Vec<Resource>,
}

/// Collection sizes, reported by the health endpoint.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StoreCounts {
    pub classes: usize,
    pub students: usize,
    pub marks: usize,
    pub syllabus_units: usize,
    pub resources: usize,
}

/// In-memory document store with write-through JSON persistence.
pub struct SchoolStore {
    docs: RwLock<Documents>,
    persist_path: PathBuf,
}

impl SchoolStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open_or_create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let docs = if path.exists() {
            let data = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("Corrupt document store at {}", path.display()))?
        } else {
            Documents::default()
        };

        Ok(Self {
            docs: RwLock::new(docs),
            persist_path: path.to_path_buf(),
        })
    }

    /// Apply a mutation to a copy of the documents, persist the copy (atomic
    /// write via temp file + rename), and only then make it visible. A failed
    /// write leaves the in-memory state untouched.
    fn mutate<R>(&self, f: impl FnOnce(&mut Documents) -> R) -> Result<R> {
        let mut docs = self.docs.write();
        let mut next = docs.clone();
        let out = f(&mut next);

        let data = serde_json::to_string_pretty(&next)?;
        let tmp_path = self.persist_path.with_extension("json.tmp");
        std::fs::write(&tmp_path, data)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.persist_path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e)
                .with_context(|| format!("Failed to replace {}", self.persist_path.display()));
        }

        *docs = next;
        Ok(out)
    }

    pub fn counts(&self) -> StoreCounts {
        let docs = self.docs.read();
        StoreCounts {
            classes: docs.classes.len(),
            students: docs.students.len(),
            marks: docs.marks.len(),
            syllabus_units: docs.syllabus.len(),
            resources: docs.resources.len(),
        }
    }

    // ─── Classes ─────────────────────────────────────────

    pub fn create_class(&self, name: &str, teacher_email: &str) -> Result<SchoolClass> {
        let class = SchoolClass {
            id: Uuid::new_v4(),
            name: name.to_string(),
            teacher_email: teacher_email.to_string(),
            created_at: Utc::now(),
        };
        let stored = class.clone();
        self.mutate(|docs| docs.classes.push(stored))?;
        Ok(class)
    }

    pub fn get_class(&self, class_id: Uuid) -> Option<SchoolClass> {
        self.docs
            .read()
            .classes
            .iter()
            .find(|c| c.id == class_id)
            .cloned()
    }

    pub fn classes_for_teacher(&self, teacher_email: &str) -> Vec<SchoolClass> {
        self.docs
            .read()
            .classes
            .iter()
            .filter(|c| c.teacher_email == teacher_email)
            .cloned()
            .collect()
    }

    /// Delete a class together with its students, subjects, marks and syllabus.
    /// Returns false if the class did not exist.
    pub fn delete_class(&self, class_id: Uuid) -> Result<bool> {
        self.mutate(|docs| {
            let before = docs.classes.len();
            docs.classes.retain(|c| c.id != class_id);
            if docs.classes.len() == before {
                return false;
            }
            docs.students.retain(|s| s.class_id != class_id);
            docs.subjects.retain(|s| s.class_id != class_id);
            docs.marks.retain(|m| m.class_id != class_id);
            docs.syllabus.retain(|s| s.class_id != class_id);
            true
        })
    }

    // ─── Students ────────────────────────────────────────

    /// Assign a student to a class, moving them if already assigned elsewhere.
    /// Marks from a previous class are dropped. Every subject of the class
    /// gets a 0 mark unless one exists.
    pub fn add_student(&self, class_id: Uuid, email: &str, name: Option<&str>) -> Result<Student> {
        let student = Student {
            email: email.to_string(),
            name: name.map(str::to_string),
            class_id,
        };
        let stored = student.clone();
        self.mutate(|docs| {
            docs.students.retain(|s| s.email != stored.email);
            docs.students.push(stored);
            docs.marks
                .retain(|m| m.student_email != email || m.class_id == class_id);

            let subjects: Vec<String> = docs
                .subjects
                .iter()
                .filter(|s| s.class_id == class_id)
                .map(|s| s.subject.clone())
                .collect();
            for subject in subjects {
                seed_mark(&mut docs.marks, email, class_id, &subject);
            }
        })?;
        Ok(student)
    }

    /// Remove a student from a class and drop their marks there.
    pub fn remove_student(&self, class_id: Uuid, email: &str) -> Result<bool> {
        self.mutate(|docs| {
            let before = docs.students.len();
            docs.students
                .retain(|s| !(s.class_id == class_id && s.email == email));
            if docs.students.len() == before {
                return false;
            }
            docs.marks
                .retain(|m| !(m.class_id == class_id && m.student_email == email));
            true
        })
    }

    pub fn students_in_class(&self, class_id: Uuid) -> Vec<Student> {
        self.docs
            .read()
            .students
            .iter()
            .filter(|s| s.class_id == class_id)
            .cloned()
            .collect()
    }

    pub fn get_student(&self, email: &str) -> Option<Student> {
        self.docs
            .read()
            .students
            .iter()
            .find(|s| s.email == email)
            .cloned()
    }

    pub fn student_class(&self, email: &str) -> Option<Uuid> {
        self.get_student(email).map(|s| s.class_id)
    }

    // ─── Subjects ────────────────────────────────────────

    /// Add a subject to a class and give every student of the class a 0 mark
    /// for it. Existing marks are kept. Adding an existing subject is a no-op
    /// apart from mark seeding.
    pub fn add_subject(&self, class_id: Uuid, subject: &str) -> Result<()> {
        self.mutate(|docs| {
            let exists = docs
                .subjects
                .iter()
                .any(|s| s.class_id == class_id && s.subject == subject);
            if !exists {
                docs.subjects.push(ClassSubject {
                    class_id,
                    subject: subject.to_string(),
                });
            }

            let emails: Vec<String> = docs
                .students
                .iter()
                .filter(|s| s.class_id == class_id)
                .map(|s| s.email.clone())
                .collect();
            for email in emails {
                seed_mark(&mut docs.marks, &email, class_id, subject);
            }
        })
    }

    /// Remove a subject with its marks and syllabus.
    pub fn remove_subject(&self, class_id: Uuid, subject: &str) -> Result<bool> {
        self.mutate(|docs| {
            let before = docs.subjects.len();
            docs.subjects
                .retain(|s| !(s.class_id == class_id && s.subject == subject));
            if docs.subjects.len() == before {
                return false;
            }
            docs.marks
                .retain(|m| !(m.class_id == class_id && m.subject == subject));
            docs.syllabus
                .retain(|s| !(s.class_id == class_id && s.subject == subject));
            true
        })
    }

    pub fn subjects_in_class(&self, class_id: Uuid) -> Vec<String> {
        self.docs
            .read()
            .subjects
            .iter()
            .filter(|s| s.class_id == class_id)
            .map(|s| s.subject.clone())
            .collect()
    }

    // ─── Marks ───────────────────────────────────────────

    /// Insert or overwrite the mark for (student, class, subject).
    pub fn upsert_mark(
        &self,
        student_email: &str,
        class_id: Uuid,
        subject: &str,
        marks: i64,
    ) -> Result<MarkRecord> {
        let record = MarkRecord {
            student_email: student_email.to_string(),
            class_id,
            subject: subject.to_string(),
            marks,
        };
        let stored = record.clone();
        self.mutate(|docs| {
            match docs.marks.iter_mut().find(|m| {
                m.student_email == stored.student_email
                    && m.class_id == stored.class_id
                    && m.subject == stored.subject
            }) {
                Some(existing) => existing.marks = stored.marks,
                None => docs.marks.push(stored),
            }
        })?;
        Ok(record)
    }

    /// Marks of one student in one class, in storage order.
    pub fn marks_for(&self, student_email: &str, class_id: Uuid) -> Vec<MarkRecord> {
        self.docs
            .read()
            .marks
            .iter()
            .filter(|m| m.student_email == student_email && m.class_id == class_id)
            .cloned()
            .collect()
    }

    pub fn marks_for_student(&self, student_email: &str) -> Vec<MarkRecord> {
        self.docs
            .read()
            .marks
            .iter()
            .filter(|m| m.student_email == student_email)
            .cloned()
            .collect()
    }

    /// Mean mark per subject across the class, rounded to 2 decimals.
    pub fn subject_averages(&self, class_id: Uuid) -> BTreeMap<String, f64> {
        let docs = self.docs.read();
        let mut totals: BTreeMap<String, (i64, u32)> = BTreeMap::new();
        for m in docs.marks.iter().filter(|m| m.class_id == class_id) {
            let entry = totals.entry(m.subject.clone()).or_insert((0, 0));
            entry.0 += m.marks;
            entry.1 += 1;
        }

        totals
            .into_iter()
            .map(|(subject, (total, count))| {
                let mean = total as f64 / count as f64;
                (subject, (mean * 100.0).round() / 100.0)
            })
            .collect()
    }

    // ─── Syllabus ────────────────────────────────────────

    /// Replace all syllabus units of (class, subject).
    pub fn replace_syllabus(
        &self,
        class_id: Uuid,
        subject: &str,
        units: &[SyllabusUnit],
    ) -> Result<()> {
        self.mutate(|docs| {
            docs.syllabus
                .retain(|s| !(s.class_id == class_id && s.subject == subject));
            docs.syllabus.extend(units.iter().map(|u| SyllabusEntry {
                class_id,
                subject: subject.to_string(),
                unit: u.unit.clone(),
                title: u.title.clone(),
                content: u.content.clone(),
            }));
        })
    }

    pub fn syllabus_units(&self, class_id: Uuid, subject: &str) -> Vec<SyllabusEntry> {
        self.docs
            .read()
            .syllabus
            .iter()
            .filter(|s| s.class_id == class_id && s.subject == subject)
            .cloned()
            .collect()
    }

    /// Unit titles and contents of (class, subject) in storage order, joined
    /// with a space.
    pub fn syllabus_text(&self, class_id: Uuid, subject: &str) -> String {
        self.docs
            .read()
            .syllabus
            .iter()
            .filter(|s| s.class_id == class_id && s.subject == subject)
            .flat_map(|s| s.title.as_deref().into_iter().chain([s.content.as_str()]))
            .collect::<Vec<_>>()
            .join(" ")
    }

    // ─── Resources ───────────────────────────────────────

    pub fn replace_resources(&self, resources: Vec<Resource>) -> Result<()> {
        self.mutate(|docs| docs.resources = resources)
    }

    pub fn resources_for(&self, subject: &str) -> Vec<Resource> {
        self.docs
            .read()
            .resources
            .iter()
            .filter(|r| r.subject == subject)
            .cloned()
            .collect()
    }
}

/// Insert a 0 mark unless the key already has one.
fn seed_mark(marks: &mut Vec<MarkRecord>, email: &str, class_id: Uuid, subject: &str) {
    let exists = marks
        .iter()
        .any(|m| m.student_email == email && m.class_id == class_id && m.subject == subject);
    if !exists {
        marks.push(MarkRecord {
            student_email: email.to_string(),
            class_id,
            subject: subject.to_string(),
            marks: 0,
        });
    }
}
