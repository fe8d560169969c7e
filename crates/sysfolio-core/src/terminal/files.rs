//! Canned file contents readable with `cat`.

pub const RESUME_TXT: &str = "# PROFESSIONAL PROFILE
      
Backend Engineer, developing scalable microservice architectures.
Specialized in high-performance systems, distributed computing, and real-time data processing.

# TECHNICAL SKILLS
- Languages: Node.js, Python, C++, SQL
- Databases: PostgreSQL, Redis, MongoDB
- Cloud: AWS, Docker
- Tools: Prometheus, Grafana, Postman

# EXPERIENCE
Senior Backend Engineer at Aparoksha Financial Services Private Limited (2024-Present)
- Created an efficient loan processing system for two-wheelers using Python and Falcon, which cut transaction times by
30% and improved system security.
- Developed a scalable integration pipeline with Bash and Python across distributed platforms, which doubled the rate of
new lender additions and greatly enhanced business scalability.
- Guided a team in building a de-duplication server to combat loan fraud, leading to an 80% reduction in duplicate
applications and significantly strengthening data integrity. Encouraged strong collaboration among team members to
enhance project delivery.

Full-Stack Developer at Expert Script Soft-Solutions (2020-2022)
- Created a product recommendation system using React and Machine learning, resulting in a 20% increase in user
engagement.
- Achieved 99.9% system reliability and uptime by integrating Apache Kafka for efficient real-time data synchronization
and inter-service communication.";

pub const SKILLS_JSON: &str = r#"{
  "backend": ["API Design", "Microservices", "Event-Driven Architecture", "Message Queues"],
  "databases": ["Query Optimization", "Replication", "ACID Compliance"],
  "devops": ["CI/CD", "Monitoring", "Auto-scaling"],
  "languages": ["Python", "C++", "SQL", "Shell Scripting"],
  "soft_skills": ["Technical Leadership", "Problem Solving", "Documentation"]
}"#;

pub const CONTACT_MD: &str = "# Contact Information
- Email: shambharkarsiddhant0698@gmail.com
- LinkedIn: https://www.linkedin.com/in/siddhant-shambharkar/
- GitHub: https://github.com/shambharkar-siddhant/siddhant-portfolio

Feel free to reach out for collaboration opportunities or to discuss backend architecture challenges!";

/// Returns the content of a canned file, matched by exact name.
pub fn canned_file(name: &str) -> Option<&'static str> {
    match name {
        "resume.txt" => Some(RESUME_TXT),
        "skills.json" => Some(SKILLS_JSON),
        "contact.md" => Some(CONTACT_MD),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(SKILLS_JSON).unwrap();
        assert_eq!(value["devops"][0], "CI/CD");
    }

    #[test]
    fn test_resume_keeps_indented_blank_line() {
        let mut lines = RESUME_TXT.lines();
        assert_eq!(lines.next(), Some("# PROFESSIONAL PROFILE"));
        assert_eq!(lines.next(), Some("      "));
        assert_eq!(
            lines.next(),
            Some("Backend Engineer, developing scalable microservice architectures.")
        );
    }

    #[test]
    fn test_unknown_file() {
        assert!(canned_file("Resume.txt").is_none());
        assert_eq!(canned_file("contact.md"), Some(CONTACT_MD));
    }
}
